//! Storefront business settings and upload storage.

use std::env;
use std::path::PathBuf;

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|raw| raw.trim().parse::<T>().ok())
}

/// Checkout and account limits.
pub struct ShopConfig;

impl ShopConfig {
    /// Flat shipping fee added to every order.
    pub fn shipping_fee() -> f64 {
        env_parse::<f64>("SHIPPING_FEE")
            .filter(|fee| fee.is_finite() && *fee >= 0.0)
            .unwrap_or(30.0)
    }

    /// Orders whose discounted subtotal reaches this amount ship for free.
    /// Unset means shipping is always charged.
    pub fn free_shipping_threshold() -> Option<f64> {
        env_parse::<f64>("FREE_SHIPPING_THRESHOLD").filter(|value| value.is_finite() && *value > 0.0)
    }

    pub fn currency() -> String {
        env::var("CURRENCY").unwrap_or_else(|_| "SAR".to_string())
    }

    pub fn max_addresses_per_user() -> u64 {
        env_parse("MAX_ADDRESSES_PER_USER").filter(|max| *max > 0).unwrap_or(3)
    }

    pub fn max_samples_per_order() -> usize {
        env_parse("MAX_SAMPLES_PER_ORDER").filter(|max| *max > 0).unwrap_or(3)
    }

    /// Capacity of the admin notification channel.
    pub fn notification_buffer() -> usize {
        env_parse("NOTIFICATION_BUFFER").filter(|size| *size > 0).unwrap_or(64)
    }
}

/// Local disk storage for uploaded images.
pub struct UploadConfig;

impl UploadConfig {
    pub fn root_dir() -> PathBuf {
        PathBuf::from(env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()))
    }

    /// URL prefix under which `root_dir` is served.
    pub fn public_path() -> String {
        let raw = env::var("UPLOAD_PUBLIC_PATH").unwrap_or_else(|_| "/uploads".to_string());
        format!("/{}", raw.trim_matches('/'))
    }

    pub fn max_file_size() -> usize {
        env_parse("UPLOAD_MAX_FILE_SIZE")
            .filter(|size| *size > 0)
            .unwrap_or(5 * 1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shop_defaults() {
        if env::var("SHIPPING_FEE").is_err() {
            assert_eq!(ShopConfig::shipping_fee(), 30.0);
        }
        if env::var("MAX_ADDRESSES_PER_USER").is_err() {
            assert_eq!(ShopConfig::max_addresses_per_user(), 3);
        }
        if env::var("FREE_SHIPPING_THRESHOLD").is_err() {
            assert!(ShopConfig::free_shipping_threshold().is_none());
        }
    }

    #[test]
    fn test_upload_defaults() {
        if env::var("UPLOAD_PUBLIC_PATH").is_err() {
            assert_eq!(UploadConfig::public_path(), "/uploads");
        }
        if env::var("UPLOAD_MAX_FILE_SIZE").is_err() {
            assert_eq!(UploadConfig::max_file_size(), 5 * 1024 * 1024);
        }
    }
}
