diesel::table! {
    bookings (booking_id) {
        booking_id -> Text,
        restaurant_name -> Text,
        restaurant_location -> Text,
        restaurant_price -> Text,
        date -> Date,
        time -> Text,
        party_size -> Int4,
        customer_name -> Text,
        customer_phone -> Text,
        customer_email -> Text,
        special_requests -> Nullable<Text>,
        status -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    people (id) {
        id -> Uuid,
        email -> Text,
        password_hash -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(bookings, people);
