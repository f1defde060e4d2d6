//! Catalog filter and sort translation into MongoDB documents.

use mongodb::bson::{doc, oid::ObjectId, Bson, Document};

use crate::domain::entities::products::Gender;

/// Catalog listing criteria after parsing the query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub categories: Vec<String>,
    pub brands: Vec<ObjectId>,
    pub gender: Option<Gender>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub in_stock: bool,
    /// Back-office listings see disabled products too.
    pub include_inactive: bool,
}

impl ProductFilter {
    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();

        if !self.include_inactive {
            filter.insert("is_active", true);
        }
        if !self.categories.is_empty() {
            let categories: Vec<Bson> = self
                .categories
                .iter()
                .map(|c| Bson::String(c.to_lowercase()))
                .collect();
            filter.insert("category", doc! { "$in": categories });
        }
        if !self.brands.is_empty() {
            let brands: Vec<Bson> = self.brands.iter().map(|b| Bson::ObjectId(*b)).collect();
            filter.insert("brand_id", doc! { "$in": brands });
        }
        if let Some(gender) = self.gender {
            filter.insert("gender", gender.as_str());
        }

        let mut bounds: Vec<Bson> = Vec::new();
        if let Some(min) = self.min_price {
            bounds.push(doc! { "$gte": [effective_price(), min] }.into());
        }
        if let Some(max) = self.max_price {
            bounds.push(doc! { "$lte": [effective_price(), max] }.into());
        }
        if !bounds.is_empty() {
            filter.insert("$expr", doc! { "$and": bounds });
        }

        if self.in_stock {
            filter.insert("total_stock", doc! { "$gt": 0 });
        }
        filter
    }
}

/// The price a shopper pays: `sale_price` when it is set and below `price`.
/// Mirrors [`Product::effective_price`](crate::domain::entities::products::Product::effective_price).
fn effective_price() -> Document {
    doc! {
        "$cond": [
            { "$and": [
                { "$gt": ["$sale_price", 0] },
                { "$lt": ["$sale_price", "$price"] },
            ] },
            "$sale_price",
            "$price",
        ]
    }
}

/// Catalog ordering; `newest` when absent or unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    PriceLowToHigh,
    PriceHighToLow,
    TitleAToZ,
    TitleZToA,
    #[default]
    Newest,
}

impl ProductSort {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("price-lowtohigh") => ProductSort::PriceLowToHigh,
            Some("price-hightolow") => ProductSort::PriceHighToLow,
            Some("title-atoz") => ProductSort::TitleAToZ,
            Some("title-ztoa") => ProductSort::TitleZToA,
            _ => ProductSort::Newest,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductSort::PriceLowToHigh => "price-lowtohigh",
            ProductSort::PriceHighToLow => "price-hightolow",
            ProductSort::TitleAToZ => "title-atoz",
            ProductSort::TitleZToA => "title-ztoa",
            ProductSort::Newest => "newest",
        }
    }

    /// `_id` is the tie-breaker so pages stay stable.
    pub fn to_document(&self) -> Document {
        match self {
            ProductSort::PriceLowToHigh => doc! { "price": 1, "_id": 1 },
            ProductSort::PriceHighToLow => doc! { "price": -1, "_id": 1 },
            ProductSort::TitleAToZ => doc! { "title": 1, "_id": 1 },
            ProductSort::TitleZToA => doc! { "title": -1, "_id": 1 },
            ProductSort::Newest => doc! { "created_at": -1, "_id": -1 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_only_active() {
        assert_eq!(ProductFilter::default().to_document(), doc! { "is_active": true });

        let admin = ProductFilter { include_inactive: true, ..Default::default() };
        assert!(admin.to_document().is_empty());
    }

    #[test]
    fn test_full_filter_document() {
        let brand = ObjectId::new();
        let filter = ProductFilter {
            categories: vec!["Oriental".into(), "floral".into()],
            brands: vec![brand],
            gender: Some(Gender::Women),
            min_price: Some(50.0),
            max_price: Some(300.0),
            in_stock: true,
            include_inactive: false,
        };

        assert_eq!(
            filter.to_document(),
            doc! {
                "is_active": true,
                "category": { "$in": ["oriental", "floral"] },
                "brand_id": { "$in": [brand] },
                "gender": "women",
                "$expr": { "$and": [
                    { "$gte": [effective_price(), 50.0] },
                    { "$lte": [effective_price(), 300.0] },
                ] },
                "total_stock": { "$gt": 0 },
            }
        );
    }

    #[test]
    fn test_price_range_uses_sale_price_when_discounted() {
        let filter = ProductFilter { max_price: Some(200.0), ..Default::default() };
        let document = filter.to_document();

        assert!(!document.contains_key("price"));
        let bound = document.get_document("$expr").unwrap().get_array("$and").unwrap();
        assert_eq!(bound.len(), 1);

        let expression = bound[0].as_document().unwrap().get_array("$lte").unwrap();
        let choice = expression[0].as_document().unwrap().get_array("$cond").unwrap();
        assert_eq!(choice[1], Bson::String("$sale_price".into()));
        assert_eq!(choice[2], Bson::String("$price".into()));
        assert_eq!(expression[1], Bson::Double(200.0));
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!(ProductSort::parse(Some("price-lowtohigh")), ProductSort::PriceLowToHigh);
        assert_eq!(ProductSort::parse(Some("TITLE-ZTOA")), ProductSort::TitleZToA);
        assert_eq!(ProductSort::parse(Some("bogus")), ProductSort::Newest);
        assert_eq!(ProductSort::parse(None), ProductSort::Newest);
        assert_eq!(
            ProductSort::PriceHighToLow.to_document(),
            doc! { "price": -1, "_id": 1 }
        );
    }
}
