//! Shopping cart rules: quantities are always checked against the current stock.

use std::collections::HashMap;
use std::sync::Arc;

use mongodb::bson::oid::ObjectId;

use singleton_macro::service;

use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::carts::{
    AddToCartRequest, CartLineResponse, CartResponse, UpdateCartQuantityRequest,
};
use crate::domain::entities::carts::Cart;
use crate::domain::entities::products::Product;
use crate::repositories::carts::CartRepository;
use crate::repositories::products::ProductRepository;
use crate::utils::string_utils::parse_object_id;

#[service(name = "cart")]
pub struct CartService {
    cart_repo: Arc<CartRepository>,
    product_repo: Arc<ProductRepository>,
}

fn ensure_stock(product: &Product, quantity: i64) -> AppResult<()> {
    if !product.has_stock_for(quantity) {
        return Err(AppError::ValidationError(format!(
            "only {} unit(s) of {} left in stock",
            product.total_stock.max(0),
            product.title
        )));
    }
    Ok(())
}

impl CartService {
    async fn load_product(&self, product_id: &ObjectId) -> AppResult<Product> {
        self.product_repo
            .find_by_id(product_id)
            .await?
            .filter(|product| product.is_active)
            .ok_or_else(|| AppError::NotFound("product not found".to_string()))
    }

    /// Joins cart lines with their products, skipping products that no longer exist.
    async fn populate(&self, cart: &Cart) -> AppResult<CartResponse> {
        if cart.is_empty() {
            return Ok(CartResponse::empty());
        }
        let ids: Vec<ObjectId> = cart.items.iter().map(|item| item.product_id).collect();
        let products: HashMap<ObjectId, Product> = self
            .product_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .filter_map(|product| product.id.map(|id| (id, product)))
            .collect();

        let lines = cart
            .items
            .iter()
            .filter_map(|item| {
                products
                    .get(&item.product_id)
                    .map(|product| CartLineResponse::new(product, item.quantity))
            })
            .collect();
        Ok(CartResponse::from_lines(lines))
    }

    /// Adds `request.quantity` units to the buyer's cart, merging with an
    /// existing line for the same product.
    ///
    /// # Errors
    ///
    /// * `NotFound` - the product does not exist or is disabled
    /// * `ValidationError` - the merged quantity exceeds the stock on hand
    pub async fn add(&self, user_id: &ObjectId, request: AddToCartRequest) -> AppResult<CartResponse> {
        let product_id = parse_object_id(&request.product_id, "product")?;
        let product = self.load_product(&product_id).await?;

        let mut cart = self.cart_repo.find_or_new(user_id).await?;
        ensure_stock(&product, cart.quantity_of(&product_id) + request.quantity)?;

        cart.add(product_id, request.quantity);
        self.cart_repo.save(&mut cart).await?;
        self.populate(&cart).await
    }

    pub async fn get(&self, user_id: &ObjectId) -> AppResult<CartResponse> {
        match self.cart_repo.find_by_user(user_id).await? {
            Some(cart) => self.populate(&cart).await,
            None => Ok(CartResponse::empty()),
        }
    }

    pub async fn update_quantity(
        &self,
        user_id: &ObjectId,
        request: UpdateCartQuantityRequest,
    ) -> AppResult<CartResponse> {
        let product_id = parse_object_id(&request.product_id, "product")?;
        let mut cart = self
            .cart_repo
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("cart not found".to_string()))?;

        let product = self.load_product(&product_id).await?;
        ensure_stock(&product, request.quantity)?;

        if !cart.set_quantity(&product_id, request.quantity) {
            return Err(AppError::NotFound("product is not in the cart".to_string()));
        }
        self.cart_repo.save(&mut cart).await?;
        self.populate(&cart).await
    }

    pub async fn remove(&self, user_id: &ObjectId, product_id: &str) -> AppResult<CartResponse> {
        let product_id = parse_object_id(product_id, "product")?;
        let mut cart = self
            .cart_repo
            .find_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("cart not found".to_string()))?;

        if !cart.remove(&product_id) {
            return Err(AppError::NotFound("product is not in the cart".to_string()));
        }
        self.cart_repo.save(&mut cart).await?;
        self.populate(&cart).await
    }

    pub async fn clear(&self, user_id: &ObjectId) -> AppResult<()> {
        self.cart_repo.clear(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::products::product::fixtures::product;

    #[test]
    fn test_stock_guard() {
        let musk = product("Musk", 90.0, 3);
        assert!(ensure_stock(&musk, 3).is_ok());
        match ensure_stock(&musk, 4) {
            Err(AppError::ValidationError(msg)) => assert!(msg.contains("only 3")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
