//! Effective image resolution
//!
//! Precedence: product `image_url` → product `image` → inventory `image_url`
//! → store default → placeholder. Only *explicit* images take part in the
//! first three steps: non-empty and not hosted on the placeholder domain.

use shared::models::{ImageSource, StoreTheme};

/// Stock-photo host used as filler, never a real upload
pub const PLACEHOLDER_HOST: &str = "images.unsplash.com";

/// Bucket renamed in storage; old URLs still point at it
pub const LEGACY_BUCKET: &str = "product-images";
pub const PRODUCTS_BUCKET: &str = "products";

/// Upload staging prefix, objects there are not meant to be served
pub const STAGING_PREFIX: &str = "temp/";

#[derive(Debug, Clone)]
pub struct ImagePolicy {
    storage_base: Option<String>,
    placeholder: String,
}

/// Image candidates of one catalog entry, in precedence order
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCandidates<'a> {
    pub product_image_url: Option<&'a str>,
    pub product_image: Option<&'a str>,
    pub inventory_image_url: Option<&'a str>,
}

impl ImagePolicy {
    pub fn new(storage_base: Option<String>, placeholder: impl Into<String>) -> Self {
        Self {
            storage_base: storage_base.map(|b| b.trim_end_matches('/').to_string()),
            placeholder: placeholder.into(),
        }
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Pick the effective image for an entry
    pub fn resolve(
        &self,
        candidates: ImageCandidates<'_>,
        theme: &StoreTheme,
    ) -> (Option<String>, ImageSource) {
        if !theme.show_images {
            return (None, ImageSource::Disabled);
        }

        let ordered = [
            (candidates.product_image_url, ImageSource::ProductImageUrl),
            (candidates.product_image, ImageSource::ProductImage),
            (candidates.inventory_image_url, ImageSource::InventoryImageUrl),
        ];
        for (raw, source) in ordered {
            if let Some(url) = raw
                && is_explicit(url)
            {
                return (Some(self.normalize(url)), source);
            }
        }

        if let Some(default) = theme.default_image_url.as_deref()
            && !default.trim().is_empty()
        {
            return (Some(self.normalize(default)), ImageSource::StoreDefault);
        }

        (Some(self.placeholder.clone()), ImageSource::Placeholder)
    }

    /// Absolute URL for a stored image reference
    ///
    /// Rewrites the legacy bucket and expands relative storage paths against
    /// the configured base. Without a base, relative paths are returned as-is.
    pub fn normalize(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if is_absolute(trimmed) {
            return rewrite_legacy_bucket(trimmed);
        }

        let path = rewrite_legacy_bucket(trimmed.trim_start_matches('/'));
        match &self.storage_base {
            Some(base) => format!("{base}/{path}"),
            None => path,
        }
    }
}

/// Non-empty and not a placeholder stock photo
pub fn is_explicit(url: &str) -> bool {
    let url = url.trim();
    !url.is_empty() && !is_placeholder(url)
}

pub fn is_placeholder(url: &str) -> bool {
    host_of(url).is_some_and(|host| host.eq_ignore_ascii_case(PLACEHOLDER_HOST))
}

pub fn is_legacy_bucket(url: &str) -> bool {
    url.trim_start_matches('/').starts_with(&format!("{LEGACY_BUCKET}/"))
        || url.contains(&format!("/{LEGACY_BUCKET}/"))
}

pub fn is_staging(url: &str) -> bool {
    url.trim_start_matches('/').starts_with(STAGING_PREFIX) || url.contains(&format!("/{STAGING_PREFIX}"))
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn host_of(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .or_else(|| url.strip_prefix("//"))?;
    rest.split(['/', '?', '#']).next().map(|h| h.split(':').next().unwrap_or(h))
}

fn rewrite_legacy_bucket(url: &str) -> String {
    let legacy_segment = format!("/{LEGACY_BUCKET}/");
    if url.contains(&legacy_segment) {
        return url.replacen(&legacy_segment, &format!("/{PRODUCTS_BUCKET}/"), 1);
    }
    match url.strip_prefix(&format!("{LEGACY_BUCKET}/")) {
        Some(rest) => format!("{PRODUCTS_BUCKET}/{rest}"),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://cdn.example.com/storage/v1/object/public";
    const UNSPLASH: &str = "https://images.unsplash.com/photo-123?w=400";

    fn policy() -> ImagePolicy {
        ImagePolicy::new(Some(format!("{BASE}/")), "https://images.unsplash.com/filler.jpg")
    }

    #[test]
    fn explicit_product_image_wins() {
        let (url, source) = policy().resolve(
            ImageCandidates {
                product_image_url: Some("products/cafe.jpg"),
                product_image: Some("products/old.jpg"),
                inventory_image_url: Some("products/inv.jpg"),
            },
            &StoreTheme::default(),
        );
        assert_eq!(url.as_deref(), Some(format!("{BASE}/products/cafe.jpg").as_str()));
        assert_eq!(source, ImageSource::ProductImageUrl);
    }

    #[test]
    fn placeholder_domain_is_not_explicit() {
        let (url, source) = policy().resolve(
            ImageCandidates {
                product_image_url: Some(UNSPLASH),
                product_image: Some("  "),
                inventory_image_url: Some("https://cdn.example.com/storage/v1/object/public/products/inv.jpg"),
            },
            &StoreTheme::default(),
        );
        assert_eq!(source, ImageSource::InventoryImageUrl);
        assert!(!url.unwrap().contains(PLACEHOLDER_HOST));
    }

    #[test]
    fn explicit_image_never_resolves_to_placeholder_domain() {
        let inputs = [
            "products/a.jpg",
            "/product-images/b.png",
            "https://cdn.example.com/storage/v1/object/public/product-images/c.jpg",
            "http://other.host/x.webp",
        ];
        for raw in inputs {
            assert!(is_explicit(raw));
            let (url, _) = policy().resolve(
                ImageCandidates {
                    product_image: Some(raw),
                    ..Default::default()
                },
                &StoreTheme::default(),
            );
            assert!(!is_placeholder(&url.unwrap()), "{raw}");
        }
    }

    #[test]
    fn falls_back_to_store_default_then_placeholder() {
        let theme = StoreTheme {
            default_image_url: Some("products/default.jpg".into()),
            ..Default::default()
        };
        let (url, source) = policy().resolve(ImageCandidates::default(), &theme);
        assert_eq!(source, ImageSource::StoreDefault);
        assert_eq!(url.unwrap(), format!("{BASE}/products/default.jpg"));

        let (url, source) = policy().resolve(ImageCandidates::default(), &StoreTheme::default());
        assert_eq!(source, ImageSource::Placeholder);
        assert_eq!(url.unwrap(), "https://images.unsplash.com/filler.jpg");
    }

    #[test]
    fn images_switched_off() {
        let theme = StoreTheme {
            show_images: false,
            ..Default::default()
        };
        let (url, source) = policy().resolve(
            ImageCandidates {
                product_image_url: Some("products/cafe.jpg"),
                ..Default::default()
            },
            &theme,
        );
        assert!(url.is_none());
        assert_eq!(source, ImageSource::Disabled);
    }

    #[test]
    fn legacy_bucket_is_rewritten() {
        let p = policy();
        assert_eq!(p.normalize("product-images/x.jpg"), format!("{BASE}/products/x.jpg"));
        assert_eq!(
            p.normalize("https://h.co/storage/v1/object/public/product-images/x.jpg"),
            "https://h.co/storage/v1/object/public/products/x.jpg"
        );
        assert_eq!(ImagePolicy::new(None, "p").normalize("/products/y.jpg"), "products/y.jpg");
    }

    #[test]
    fn classification_helpers() {
        assert!(is_placeholder(UNSPLASH));
        assert!(!is_placeholder("https://cdn.example.com/images.unsplash.com.jpg"));
        assert!(is_legacy_bucket("product-images/a.jpg"));
        assert!(is_legacy_bucket("https://h.co/x/product-images/a.jpg"));
        assert!(!is_legacy_bucket("products/a.jpg"));
        assert!(is_staging("temp/upload.jpg"));
        assert!(is_staging("https://h.co/public/products/temp/upload.jpg"));
        assert!(!is_staging("products/template.jpg"));
    }
}
