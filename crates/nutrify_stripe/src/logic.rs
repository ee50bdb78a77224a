// --- File: crates/nutrify_stripe/src/logic.rs ---
use nutrify_config::StripeConfig;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use tracing::info;

use crate::error::StripeError;
use crate::service::CheckoutProvider;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Locale stored when the applicant did not pick a language.
pub const DEFAULT_LANGUAGE: &str = "ar";

/// Stripe replaces this token with the session id on redirect.
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

const SECRET_KEY_PREFIXES: [&str; 2] = ["sk_test_", "sk_live_"];
const KNOWN_KEY_PREFIXES: [&str; 6] = [
    "sk_test_", "sk_live_", "pk_test_", "pk_live_", "rk_test_", "rk_live_",
];

// --- Data Structures ---

/// Applicant intake form posted by the signup page.
///
/// Every field is optional and accepted loosely: strings, numbers and booleans
/// are coerced to text, while `null`, `false`, `0` and `""` count as absent.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct IntakeForm {
    #[serde(default, deserialize_with = "loose_text")]
    #[cfg_attr(feature = "openapi", schema(example = "advanced"))]
    pub plan: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    #[cfg_attr(feature = "openapi", schema(example = "sara@example.com"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    #[cfg_attr(feature = "openapi", schema(example = "Sara"))]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    #[cfg_attr(feature = "openapi", schema(example = "ar"))]
    pub preferred_language: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    #[cfg_attr(feature = "openapi", schema(example = "1994-03-12"))]
    pub date_of_birth: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    #[cfg_attr(feature = "openapi", schema(example = "170"))]
    pub height_cm: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    #[cfg_attr(feature = "openapi", schema(example = "64.5"))]
    pub weight_kg: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub activity_level: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    #[cfg_attr(feature = "openapi", schema(example = "3"))]
    pub meals_per_day: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub goal: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub conditions: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub allergies: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub meds_supplements: Option<String>,
}

fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_text))
}

/// Renders a JSON value as metadata text, `None` for falsy values.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(number_text(n)),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// Whole floats (`170.0`, `1e2`) render without a fractional part.
fn number_text(n: &Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                return (f as i64).to_string();
            }
        }
    }
    n.to_string()
}

/// Decodes the request body into an [`IntakeForm`].
///
/// An empty body or a JSON value that is not an object yields an empty form;
/// only syntactically broken JSON is rejected.
pub fn parse_intake_body(body: &[u8]) -> Result<IntakeForm, StripeError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(IntakeForm::default());
    }
    let value: Value =
        serde_json::from_slice(body).map_err(|e| StripeError::InvalidBody(e.to_string()))?;
    match value {
        Value::Object(_) => {
            serde_json::from_value(value).map_err(|e| StripeError::InvalidBody(e.to_string()))
        }
        _ => Ok(IntakeForm::default()),
    }
}

/// Subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Plan {
    #[default]
    Basic,
    Advanced,
}

impl Plan {
    /// Only the exact string `"advanced"` selects the advanced tier.
    pub fn from_input(raw: Option<&str>) -> Self {
        match raw {
            Some("advanced") => Plan::Advanced,
            _ => Plan::Basic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Basic => "basic",
            Plan::Advanced => "advanced",
        }
    }

    /// The configured Stripe price for this tier.
    pub fn price_id<'a>(&self, config: &'a StripeConfig) -> Option<&'a str> {
        match self {
            Plan::Basic => config.price_basic.as_deref(),
            Plan::Advanced => config.price_advanced.as_deref(),
        }
    }
}

/// Metadata attached to both the subscription and the checkout session.
///
/// Every value is a string; absent answers are stored as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntakeMetadata {
    pub plan: String,
    pub full_name: String,
    pub phone: String,
    pub preferred_language: String,
    pub gender: String,
    pub date_of_birth: String,
    pub height_cm: String,
    pub weight_kg: String,
    pub activity_level: String,
    pub meals_per_day: String,
    pub goal: String,
    pub conditions: String,
    pub allergies: String,
    pub meds_supplements: String,
}

impl IntakeMetadata {
    pub fn assemble(plan: Plan, form: &IntakeForm) -> Self {
        let text = |field: &Option<String>| field.clone().unwrap_or_default();
        Self {
            plan: plan.as_str().to_string(),
            full_name: text(&form.full_name),
            phone: text(&form.phone),
            preferred_language: form
                .preferred_language
                .clone()
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            gender: text(&form.gender),
            date_of_birth: text(&form.date_of_birth),
            height_cm: text(&form.height_cm),
            weight_kg: text(&form.weight_kg),
            activity_level: text(&form.activity_level),
            meals_per_day: text(&form.meals_per_day),
            goal: text(&form.goal),
            conditions: text(&form.conditions),
            allergies: text(&form.allergies),
            meds_supplements: text(&form.meds_supplements),
        }
    }

    /// Key/value pairs in a stable order.
    pub fn entries(&self) -> [(&'static str, &str); 14] {
        [
            ("plan", self.plan.as_str()),
            ("full_name", self.full_name.as_str()),
            ("phone", self.phone.as_str()),
            ("preferred_language", self.preferred_language.as_str()),
            ("gender", self.gender.as_str()),
            ("date_of_birth", self.date_of_birth.as_str()),
            ("height_cm", self.height_cm.as_str()),
            ("weight_kg", self.weight_kg.as_str()),
            ("activity_level", self.activity_level.as_str()),
            ("meals_per_day", self.meals_per_day.as_str()),
            ("goal", self.goal.as_str()),
            ("conditions", self.conditions.as_str()),
            ("allergies", self.allergies.as_str()),
            ("meds_supplements", self.meds_supplements.as_str()),
        ]
    }
}

/// Everything needed for one `POST /v1/checkout/sessions` call, minus the secret key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSessionParams {
    pub plan: Plan,
    pub price_id: Option<String>,
    pub quantity: u32,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
    pub customer_email: Option<String>,
    pub metadata: IntakeMetadata,
}

impl CheckoutSessionParams {
    pub fn build(form: &IntakeForm, config: &StripeConfig) -> Self {
        let plan = Plan::from_input(form.plan.as_deref());
        Self {
            plan,
            price_id: plan.price_id(config).map(String::from),
            quantity: 1,
            success_url: config.success_url.as_deref().map(success_url_with_session_id),
            cancel_url: config.cancel_url.clone(),
            customer_email: form.email.clone(),
            metadata: IntakeMetadata::assemble(plan, form),
        }
    }

    /// Form-encoded body for the Stripe API.
    pub fn to_form_params(&self) -> Vec<(String, String)> {
        let mut form_body: Vec<(String, String)> = vec![
            ("mode".to_string(), "subscription".to_string()),
            ("line_items[0][quantity]".to_string(), self.quantity.to_string()),
            ("customer_creation".to_string(), "always".to_string()),
            ("phone_number_collection[enabled]".to_string(), "true".to_string()),
            ("allow_promotion_codes".to_string(), "true".to_string()),
        ];
        if let Some(price_id) = &self.price_id {
            form_body.push(("line_items[0][price]".to_string(), price_id.clone()));
        }
        if let Some(success_url) = &self.success_url {
            form_body.push(("success_url".to_string(), success_url.clone()));
        }
        if let Some(cancel_url) = &self.cancel_url {
            form_body.push(("cancel_url".to_string(), cancel_url.clone()));
        }
        if let Some(email) = &self.customer_email {
            form_body.push(("customer_email".to_string(), email.clone()));
        }
        for (key, value) in self.metadata.entries() {
            form_body.push((
                format!("subscription_data[metadata][{}]", key),
                value.to_string(),
            ));
        }
        for (key, value) in self.metadata.entries() {
            form_body.push((format!("metadata[{}]", key), value.to_string()));
        }
        form_body
    }
}

/// Appends `session_id={CHECKOUT_SESSION_ID}` as a query parameter.
pub fn success_url_with_session_id(success_url: &str) -> String {
    let separator = if success_url.contains('?') { '&' } else { '?' };
    format!("{}{}session_id={}", success_url, separator, SESSION_ID_PLACEHOLDER)
}

/// Returns the secret key if it is present and shaped like `sk_(test|live)_<alphanumeric>`.
pub fn validate_secret_key(secret_key: Option<&str>) -> Result<&str, StripeError> {
    let key = secret_key.ok_or(StripeError::MissingSecretKey)?;
    let rest = SECRET_KEY_PREFIXES
        .iter()
        .find_map(|prefix| key.strip_prefix(prefix));
    match rest {
        Some(rest) if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric()) => {
            Ok(key)
        }
        _ => Err(StripeError::MalformedSecretKey(redact_secret_key(key))),
    }
}

/// Log-safe rendering of a key: the well-known prefix, if any, and the length.
pub fn redact_secret_key(key: &str) -> String {
    let prefix = KNOWN_KEY_PREFIXES
        .iter()
        .find(|p| key.starts_with(**p))
        .copied()
        .unwrap_or("");
    format!("{}*** ({} chars)", prefix, key.chars().count())
}

/// Response to the browser.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateCheckoutSessionResponse {
    #[cfg_attr(
        feature = "openapi",
        schema(example = "https://checkout.stripe.com/c/pay/cs_test_a1...")
    )]
    pub url: String,
}

// --- Core Logic Function ---

/// Validates the key, decodes the intake form and asks the provider for a session.
///
/// The provider is never called when the key is missing or malformed.
pub async fn create_checkout_session(
    provider: &dyn CheckoutProvider,
    stripe_config: &StripeConfig,
    body: &[u8],
) -> Result<CreateCheckoutSessionResponse, StripeError> {
    let secret_key = validate_secret_key(stripe_config.secret_key.as_deref())?;
    let form = parse_intake_body(body)?;
    let params = CheckoutSessionParams::build(&form, stripe_config);

    info!(
        "[Stripe Logic] Creating subscription checkout session. Plan: {}, price: {:?}",
        params.plan.as_str(),
        params.price_id
    );

    let session = provider.create_checkout_session(secret_key, &params).await?;

    info!("[Stripe Logic] Checkout session {} created", session.id);
    Ok(CreateCheckoutSessionResponse { url: session.url })
}
