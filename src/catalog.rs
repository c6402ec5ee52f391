// src/catalog.rs

/// Static product catalog.
///
/// The full shop config (descriptions, localized copy, feature lists) lives
/// with the storefront; the checkout layer only needs the set of known
/// product IDs, prices and downloadable files.
#[derive(Debug, Clone, Copy)]
pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
    pub price: f64,
    pub downloads: &'static [DownloadItem],
}

#[derive(Debug, Clone, Copy)]
pub struct DownloadItem {
    pub id: &'static str,
    pub name: &'static str,
    pub file_name: &'static str,
}

/// Buying this product unlocks every other product in the catalog.
pub const BUNDLE_PRODUCT_ID: &str = "complete-bundle";

const PRODUCTS: &[Product] = &[
    Product {
        id: "complete-growth-kit",
        name: "Complete Creator Growth Kit",
        price: 99.0,
        downloads: &[
            DownloadItem {
                id: "growth-guide",
                name: "Creator Growth Guide",
                file_name: "creator-growth-guide",
            },
            DownloadItem {
                id: "media-kit",
                name: "Media Kit Template",
                file_name: "media-kit-template",
            },
        ],
    },
    Product {
        id: "reels-mastery",
        name: "Instagram Reels Mastery Course",
        price: 199.0,
        downloads: &[DownloadItem {
            id: "reels-course",
            name: "Reels Mastery Course PDF",
            file_name: "reels-mastery-course",
        }],
    },
    Product {
        id: "brand-masterclass",
        name: "Brand Collaboration Masterclass",
        price: 299.0,
        downloads: &[DownloadItem {
            id: "brand-guide",
            name: "Brand Collaboration Guide",
            file_name: "brand-collaboration-guide",
        }],
    },
    Product {
        id: "youtube-mastery",
        name: "YouTube Growth Mastery",
        price: 249.0,
        downloads: &[DownloadItem {
            id: "youtube-guide",
            name: "YouTube Growth Guide",
            file_name: "youtube-growth-guide",
        }],
    },
    Product {
        id: "facebook-posting-mastery",
        name: "Facebook Posting Mastery",
        price: 149.0,
        downloads: &[DownloadItem {
            id: "facebook-guide",
            name: "Facebook Posting Guide",
            file_name: "facebook-posting-guide",
        }],
    },
    Product {
        id: BUNDLE_PRODUCT_ID,
        name: "Complete Creator Bundle",
        price: 599.0,
        downloads: &[],
    },
];

pub fn all_products() -> &'static [Product] {
    PRODUCTS
}

pub fn product(id: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.id == id)
}
