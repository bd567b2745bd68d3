//! `define_port_error!` generates a `thiserror` enum for a port plus one
//! snake_case constructor per variant, taking `impl Into<T>` for each field.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@fields $variant [] [] $( $field : $ty, )*);
    };

    (@fields $variant:ident [$($params:tt)*] [$($inits:tt)*]) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@fields $variant:ident [$($params:tt)*] [$($inits:tt)*] $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @fields
            $variant
            [$($params)* $field: impl Into<$ty>,]
            [$($inits)* $field: $field.into(),]
            $($rest)*
        );
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum DemoError {
            Closed => "closed",
            Query { message: String } => "query failed: {message}",
            Status { status: u16 } => "unexpected status {status}",
            Duplicate { table: String, id: i32 } => "duplicate {table}#{id}",
        }
    }

    #[test]
    fn unit_variants_get_plain_constructors() {
        assert_eq!(DemoError::closed(), DemoError::Closed);
    }

    #[test]
    fn string_fields_accept_str() {
        assert_eq!(DemoError::query("timeout").to_string(), "query failed: timeout");
    }

    #[test]
    fn numeric_fields_keep_their_type() {
        assert_eq!(DemoError::status(503_u16).to_string(), "unexpected status 503");
    }

    #[test]
    fn multiple_fields_are_supported() {
        assert_eq!(DemoError::duplicate("posts", 7).to_string(), "duplicate posts#7");
    }
}
