// Diesel table definitions matching `backend/migrations`.

diesel::table! {
    users (id) {
        id -> Int4,
        #[max_length = 100]
        email -> Varchar,
        #[max_length = 255]
        password_hash -> Varchar,
        #[max_length = 1000]
        name -> Varchar,
        #[max_length = 16]
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    blog_posts (id) {
        id -> Int4,
        author_id -> Int4,
        #[max_length = 250]
        title -> Varchar,
        #[max_length = 500]
        subtitle -> Varchar,
        #[max_length = 250]
        display_date -> Varchar,
        body -> Text,
        #[max_length = 250]
        img_url -> Varchar,
    }
}

diesel::table! {
    comments (id) {
        id -> Int4,
        author_id -> Int4,
        post_id -> Int4,
        body -> Text,
    }
}

diesel::joinable!(blog_posts -> users (author_id));
diesel::joinable!(comments -> users (author_id));
diesel::joinable!(comments -> blog_posts (post_id));

diesel::allow_tables_to_appear_in_same_query!(users, blog_posts, comments);
