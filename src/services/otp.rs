use rand::Rng;

/// Six decimal digits, uniform over the whole range.
pub fn generate_otp() -> String {
    rand::rng().random_range(100_000..=999_999).to_string()
}
