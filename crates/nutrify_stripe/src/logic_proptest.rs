#[cfg(test)]
mod tests {
    use crate::error::StripeError;
    use crate::logic::{
        coerce_text, parse_intake_body, IntakeForm, IntakeMetadata, Plan, DEFAULT_LANGUAGE,
    };
    use proptest::prelude::*;
    use serde_json::{Map, Value};
    use std::collections::HashMap;

    const FORM_FIELDS: [&str; 15] = [
        "plan",
        "email",
        "full_name",
        "phone",
        "preferred_language",
        "gender",
        "date_of_birth",
        "height_cm",
        "weight_kg",
        "activity_level",
        "meals_per_day",
        "goal",
        "conditions",
        "allergies",
        "meds_supplements",
    ];

    const METADATA_KEYS: [&str; 14] = [
        "plan",
        "full_name",
        "phone",
        "preferred_language",
        "gender",
        "date_of_birth",
        "height_cm",
        "weight_kg",
        "activity_level",
        "meals_per_day",
        "goal",
        "conditions",
        "allergies",
        "meds_supplements",
    ];

    // Arbitrary JSON, nested a few levels, biased towards the plan literals
    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            any::<f64>().prop_map(Value::from),
            any::<String>().prop_map(Value::String),
            prop_oneof![Just("advanced"), Just("basic"), Just("Advanced"), Just("")]
                .prop_map(|s| Value::String(s.to_string())),
        ];
        leaf.prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::hash_map("[a-z_]{1,10}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    // An object with any subset of the form fields plus unrelated keys
    fn arb_form_object() -> impl Strategy<Value = Map<String, Value>> {
        (
            prop::collection::hash_map(prop::sample::select(FORM_FIELDS.to_vec()), arb_json(), 0..16),
            prop::collection::hash_map("[a-z_]{1,12}", arb_json(), 0..4),
        )
            .prop_map(|(fields, extras)| {
                let mut object: Map<String, Value> = extras.into_iter().collect();
                for (key, value) in fields {
                    object.insert(key.to_string(), value);
                }
                object
            })
    }

    proptest! {
        // Only the exact string "advanced" selects the advanced tier
        #[test]
        fn test_plan_is_advanced_only_for_exact_literal(plan in arb_json()) {
            let body = Value::Object(Map::from_iter([("plan".to_string(), plan.clone())]));
            let form = parse_intake_body(body.to_string().as_bytes()).unwrap();
            let selected = Plan::from_input(form.plan.as_deref());

            let is_advanced_literal = plan == Value::String("advanced".to_string());
            prop_assert_eq!(selected == Plan::Advanced, is_advanced_literal);
        }

        #[test]
        fn test_plan_from_arbitrary_text(raw in any::<String>()) {
            let expected = if raw == "advanced" { Plan::Advanced } else { Plan::Basic };
            prop_assert_eq!(Plan::from_input(Some(&raw)), expected);
        }

        // Every metadata key is present and carries the coerced field value
        #[test]
        fn test_metadata_is_total(object in arb_form_object()) {
            let body = Value::Object(object).to_string();
            let form = parse_intake_body(body.as_bytes()).unwrap();
            // Compare against what the server decodes, not the generated floats
            let sent: Value = serde_json::from_str(&body).unwrap();
            let plan = Plan::from_input(form.plan.as_deref());
            let metadata = IntakeMetadata::assemble(plan, &form);

            let entries = metadata.entries();
            let keys: Vec<&str> = entries.iter().map(|(k, _)| *k).collect();
            prop_assert_eq!(keys, METADATA_KEYS.to_vec());

            let values: HashMap<&str, &str> = entries.iter().copied().collect();
            prop_assert!(values["plan"] == "basic" || values["plan"] == "advanced");
            prop_assert!(!values["preferred_language"].is_empty());

            for key in METADATA_KEYS.iter().filter(|k| **k != "plan") {
                let coerced = sent.get(*key).and_then(coerce_text);
                let expected = match (*key, coerced) {
                    (_, Some(text)) => text,
                    ("preferred_language", None) => DEFAULT_LANGUAGE.to_string(),
                    (_, None) => String::new(),
                };
                prop_assert_eq!(values[key], expected.as_str(), "field {}", key);
            }
        }

        // Any well-formed JSON body is accepted; non-objects decode to an empty form
        #[test]
        fn test_any_json_body_is_accepted(value in arb_json()) {
            let result = parse_intake_body(value.to_string().as_bytes());
            prop_assert!(result.is_ok());
            if !value.is_object() {
                prop_assert_eq!(result.unwrap(), IntakeForm::default());
            }
        }

        // Arbitrary bytes either decode or fail as an invalid body
        #[test]
        fn test_arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
            match parse_intake_body(&bytes) {
                Ok(_) | Err(StripeError::InvalidBody(_)) => {}
                Err(other) => prop_assert!(false, "unexpected error: {:?}", other),
            }
        }

        // Whole numbers render the same whether sent as integer or float
        #[test]
        fn test_whole_numbers_render_as_integers(n in -(1i64 << 53)..(1i64 << 53)) {
            prop_assume!(n != 0);
            prop_assert_eq!(coerce_text(&Value::from(n as f64)), Some(n.to_string()));
            prop_assert_eq!(coerce_text(&Value::from(n)), Some(n.to_string()));
        }
    }
}
