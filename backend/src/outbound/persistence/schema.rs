//! Diesel table definitions. Keep in sync with `migrations/`.

diesel::table! {
    records (id) {
        id -> Int8,
        first_name -> Text,
        last_name -> Text,
        company -> Text,
        address -> Text,
        city -> Text,
        county -> Text,
        postal -> Text,
        phone -> Text,
        email -> Text,
        web -> Text,
    }
}
