diesel::table! {
    meals (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Text,
        meal_type -> Varchar,
        dietary_preference -> Varchar,
        cuisine -> Nullable<Varchar>,
        prep_time -> Nullable<Varchar>,
        ingredients -> Array<Text>,
        instructions -> Array<Text>,
        tags -> Array<Text>,
    }
}
