table! {
    subscriptions (id) {
        id -> Uuid,
        user_id -> Uuid,
        city -> Text,
        frequency -> Text,
        created_at -> Timestamptz,
    }
}

table! {
    tokens (id) {
        id -> Uuid,
        value -> Text,
        token_type -> Text,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

table! {
    users (id) {
        id -> Uuid,
        email -> Text,
        is_confirmed -> Bool,
        created_at -> Timestamptz,
    }
}

joinable!(subscriptions -> users (user_id));
joinable!(tokens -> users (user_id));

allow_tables_to_appear_in_same_query!(subscriptions, tokens, users);
