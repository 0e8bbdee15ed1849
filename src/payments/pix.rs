use uuid::Uuid;

pub const PAYMENT_INSTRUCTIONS: &str =
    "Copy and paste the PIX key into your banking app to complete the payment";

/// Externally visible identifier for one payment attempt. Generated once at
/// creation, never reused.
pub fn new_transaction_id() -> String {
    Uuid::new_v4().to_string()
}

/// Synthetic BR-Code-style payload. The field layout imitates the EMV
/// "copia e cola" format around a random key, but carries no real banking
/// meaning.
pub fn new_pix_payload() -> String {
    let key = Uuid::new_v4().simple().to_string();
    format!(
        "00020126580014br.gov.bcb.pix0136{key}520400005303986\
         5802BR5918PIXMART DEMO STORE6009SAO PAULO62070503***6304"
    )
}
