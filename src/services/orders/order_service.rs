//! # Order service
//!
//! Checkout and the order lifecycle.
//!
//! Placing an order walks through a fixed sequence: resolve the buyer, the
//! lines and the address, apply the payment-method rules, price the order,
//! reserve stock, persist, then record coupon and sample usage. Any failure
//! after stock was reserved undoes what was already written, so a rejected
//! checkout leaves the catalog, the coupon and the sample history untouched.
//!
//! Status changes made from the back office move stock as well: entering
//! `cancelled` or `rejected` puts units back on the shelf and leaving them takes
//! the units again (see [`OrderStatus::stock_effect`]). Every status write is
//! guarded on the status it was read in, so two concurrent admin actions cannot
//! release the same stock twice.

use std::collections::HashMap;
use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};

use singleton_macro::service;

use crate::config::ShopConfig;
use crate::core::errors::{AppError, AppResult};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::dto::common::{PageQuery, Paginated};
use crate::domain::dto::orders::{CreateOrderRequest, OrderListQuery, OrderResponse};
use crate::domain::entities::coupons::Coupon;
use crate::domain::entities::orders::{
    AppliedCoupon, Order, OrderItem, OrderStatus, Payment, PaymentMethod, PaymentStatus, StockEffect,
};
use crate::domain::entities::products::Product;
use crate::domain::entities::samples::SampleStatus;
use crate::domain::models::notifications::AdminNotification;
use crate::domain::models::uploads::UploadCategory;
use crate::repositories::carts::CartRepository;
use crate::repositories::orders::OrderRepository;
use crate::repositories::products::ProductRepository;
use crate::repositories::users::UserRepository;
use crate::services::addresses::AddressService;
use crate::services::coupons::CouponService;
use crate::services::notifications::NotificationService;
use crate::services::orders::pricing::OrderTotals;
use crate::services::samples::SampleService;
use crate::services::uploads::UploadService;
use crate::utils::format_utils::to_rfc3339;
use crate::utils::string_utils::{clean_optional_string, parse_object_id};

/// Sums quantities of repeated products, keeping first-seen order.
fn merge_lines(lines: Vec<(ObjectId, i64)>) -> Vec<(ObjectId, i64)> {
    let mut merged: Vec<(ObjectId, i64)> = Vec::with_capacity(lines.len());
    for (product_id, quantity) in lines {
        match merged.iter_mut().find(|(id, _)| *id == product_id) {
            Some((_, total)) => *total += quantity,
            None => merged.push((product_id, quantity)),
        }
    }
    merged
}

fn stock_lines(items: &[OrderItem]) -> Vec<(ObjectId, i64)> {
    items.iter().map(|item| (item.product_id, item.quantity)).collect()
}

/// Status a free sample takes while its order is in `status`.
fn sample_status_for(status: OrderStatus) -> SampleStatus {
    match status {
        OrderStatus::Pending => SampleStatus::Pending,
        OrderStatus::Confirmed | OrderStatus::InProcess => SampleStatus::Approved,
        OrderStatus::InShipping | OrderStatus::Delivered => SampleStatus::Shipped,
        OrderStatus::Rejected | OrderStatus::Cancelled => SampleStatus::Rejected,
    }
}

/// Extra fields written together with a status change.
fn status_side_fields(order: &Order, to: OrderStatus) -> Document {
    let mut fields = Document::new();
    if to == OrderStatus::Delivered
        && order.payment.method == PaymentMethod::Cod
        && order.payment.status != PaymentStatus::Paid
    {
        fields.insert("payment.status", PaymentStatus::Paid.as_str());
        fields.insert("payment.paid_at", DateTime::now());
    }
    fields
}

fn order_line(product_id: ObjectId, product: &Product, quantity: i64) -> OrderItem {
    OrderItem {
        product_id,
        title: product.title.clone(),
        image: product.primary_image(),
        price: product.effective_price(),
        quantity,
        is_sample: false,
    }
}

/// Turns priced lines into free samples, one unit each.
fn into_samples(items: Vec<OrderItem>, products: &HashMap<ObjectId, Product>) -> AppResult<Vec<OrderItem>> {
    let max = ShopConfig::max_samples_per_order();
    if items.len() > max {
        return Err(AppError::ValidationError(format!(
            "a sample order may contain at most {} products",
            max
        )));
    }

    items
        .into_iter()
        .map(|item| {
            let offered = products
                .get(&item.product_id)
                .map(|product| product.sample_available)
                .unwrap_or(false);
            if !offered {
                return Err(AppError::ValidationError(format!(
                    "no sample is offered for {}",
                    item.title
                )));
            }
            Ok(OrderItem {
                price: 0.0,
                quantity: 1,
                is_sample: true,
                ..item
            })
        })
        .collect()
}

#[service(name = "order")]
pub struct OrderService {
    order_repo: Arc<OrderRepository>,
    product_repo: Arc<ProductRepository>,
    user_repo: Arc<UserRepository>,
    cart_repo: Arc<CartRepository>,
    address_service: Arc<AddressService>,
    coupon_service: Arc<CouponService>,
    sample_service: Arc<SampleService>,
    upload_service: Arc<UploadService>,
    notification_service: Arc<NotificationService>,
}

impl OrderService {
    /// Places an order for `user_id`.
    ///
    /// Lines come from `request.items` or, when absent, from the buyer's cart,
    /// which is emptied once the order is stored. Prices are taken from the
    /// catalog at this moment and frozen into the order.
    ///
    /// # Arguments
    ///
    /// * `user_id` - the authenticated buyer
    /// * `request` - lines, delivery address, payment method and optional coupon
    ///
    /// # Returns
    ///
    /// The stored order, including computed totals and the payment state.
    ///
    /// # Errors
    ///
    /// * `NotFound` - unknown user, product, saved address or coupon
    /// * `AuthorizationError` - the account is suspended
    /// * `ValidationError` - missing address or payment proof, empty order,
    ///   sample rules broken
    /// * `RuleViolation` - the coupon does not apply (see `reason`)
    /// * `ConflictError` - a product ran out of stock or the coupon's last use
    ///   was taken concurrently
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let request: CreateOrderRequest = serde_json::from_value(json!({
    ///     "payment_method": "cod",
    ///     "address_id": address_id,
    /// }))?;
    /// let order = OrderService::instance().create(&user_id, request).await?;
    /// assert_eq!(order.order_status, OrderStatus::Pending);
    /// ```
    pub async fn create(&self, user_id: &ObjectId, request: CreateOrderRequest) -> AppResult<OrderResponse> {
        let start = std::time::Instant::now();

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;
        if !user.is_active() {
            return Err(AppError::AuthorizationError("your account is suspended".to_string()));
        }

        let (lines, from_cart) = self.resolve_lines(user_id, &request).await?;

        let ids: Vec<ObjectId> = lines.iter().map(|(id, _)| *id).collect();
        let products: HashMap<ObjectId, Product> = self
            .product_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .filter(|product| product.is_active)
            .filter_map(|product| product.id.map(|id| (id, product)))
            .collect();

        let mut items = Vec::with_capacity(lines.len());
        for (product_id, quantity) in &lines {
            let product = products
                .get(product_id)
                .ok_or_else(|| AppError::NotFound(format!("product {} not found", product_id)))?;
            items.push(order_line(*product_id, product, *quantity));
        }

        let address = match (&request.address_id, &request.address) {
            (Some(address_id), _) => self.address_service.snapshot_owned(user_id, address_id).await?,
            (None, Some(inline)) => inline.clone().into_snapshot(),
            (None, None) => {
                return Err(AppError::ValidationError("a delivery address is required".to_string()));
            }
        };

        let method = request.payment_method;
        let mut payment = Payment {
            method,
            status: PaymentStatus::initial_for(method),
            proof: None,
            transfer_reference: None,
            paid_at: None,
        };

        match method {
            PaymentMethod::Cod => {}
            PaymentMethod::BankTransfer => {
                let proof_name = clean_optional_string(request.payment_proof.clone()).ok_or_else(|| {
                    AppError::ValidationError("bank transfer orders require a payment proof".to_string())
                })?;
                let proof = self
                    .upload_service
                    .metadata_for(UploadCategory::Payments, &proof_name)
                    .await?
                    .ok_or_else(|| AppError::ValidationError("payment proof not found".to_string()))?;
                payment.proof = Some(proof);
                payment.transfer_reference = clean_optional_string(request.transfer_reference.clone());
            }
            PaymentMethod::FreeSample => {
                if request.coupon_code().is_some() {
                    return Err(AppError::ValidationError(
                        "coupons cannot be applied to sample orders".to_string(),
                    ));
                }
                items = into_samples(items, &products)?;
                let requested: Vec<(ObjectId, String)> = items
                    .iter()
                    .map(|item| (item.product_id, item.title.clone()))
                    .collect();
                self.sample_service.ensure_not_requested(user_id, &requested).await?;
            }
        }

        let shipping_fee = ShopConfig::shipping_fee();
        let threshold = ShopConfig::free_shipping_threshold();
        let subtotal = OrderTotals::compute(&items, 0.0, shipping_fee, threshold).subtotal;

        let coupon: Option<(Coupon, f64)> = match request.coupon_code() {
            Some(code) => Some(self.coupon_service.resolve(code, subtotal, user_id).await?),
            None => None,
        };
        let discount = coupon.as_ref().map(|(_, amount)| *amount).unwrap_or(0.0);
        let totals = OrderTotals::compute(&items, discount, shipping_fee, threshold);

        let reserved = stock_lines(&items);
        if let Err(product_id) = self.product_repo.reserve_all(&reserved).await? {
            let title = products
                .get(&product_id)
                .map(|product| product.title.as_str())
                .unwrap_or("a product");
            return Err(AppError::ConflictError(format!("{} is out of stock", title)));
        }

        let now = DateTime::now();
        let order = Order {
            id: None,
            user_id: *user_id,
            items,
            address,
            subtotal: totals.subtotal,
            shipping_fee: totals.shipping_fee,
            discount: totals.discount,
            total: totals.total,
            coupon: coupon.as_ref().and_then(|(coupon, _)| {
                coupon.id.map(|coupon_id| AppliedCoupon {
                    coupon_id,
                    code: coupon.code.clone(),
                    discount_type: coupon.discount_type,
                    discount_value: coupon.discount_value,
                    discount_amount: totals.discount,
                })
            }),
            payment,
            order_status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let order = match self.order_repo.create(order).await {
            Ok(order) => order,
            Err(e) => {
                self.product_repo.release_all(&reserved).await;
                return Err(e);
            }
        };
        let order_id = order
            .id
            .ok_or_else(|| AppError::InternalError("order was saved without an id".to_string()))?;

        if let Err(e) = self.record_side_effects(&order, &order_id).await {
            log::warn!("Rolling back order {}: {}", order_id, e);
            self.rollback(&order, &order_id).await;
            return Err(e);
        }

        if from_cart {
            if let Err(e) = self.cart_repo.clear(user_id).await {
                log::warn!("Order {} placed but cart of {} not cleared: {}", order_id, user_id, e);
            }
        }

        log::info!(
            "Order {} placed by {} ({}, total {:.2})",
            order_id,
            user.email,
            method.as_str(),
            order.total
        );
        log::debug!("Checkout took {:?}", start.elapsed());

        self.notification_service.publish(AdminNotification::NewOrder {
            order_id: order_id.to_hex(),
            customer_name: user.user_name.clone(),
            total: order.total,
            payment_method: method.as_str().to_string(),
            item_count: order.item_count(),
            created_at: to_rfc3339(order.created_at),
        });

        Ok(OrderResponse::from(order))
    }

    /// Lines from the request body, or from the cart when the body has none.
    async fn resolve_lines(
        &self,
        user_id: &ObjectId,
        request: &CreateOrderRequest,
    ) -> AppResult<(Vec<(ObjectId, i64)>, bool)> {
        let (lines, from_cart) = match &request.items {
            Some(items) => {
                let mut lines = Vec::with_capacity(items.len());
                for item in items {
                    lines.push((parse_object_id(&item.product_id, "product")?, item.quantity));
                }
                (lines, false)
            }
            None => {
                let cart = self.cart_repo.find_by_user(user_id).await?;
                let lines = cart
                    .map(|cart| {
                        cart.items
                            .into_iter()
                            .map(|item| (item.product_id, item.quantity))
                            .collect()
                    })
                    .unwrap_or_default();
                (lines, true)
            }
        };

        let lines: Vec<(ObjectId, i64)> = merge_lines(lines)
            .into_iter()
            .filter(|(_, quantity)| *quantity > 0)
            .collect();
        if lines.is_empty() {
            return Err(AppError::ValidationError("your order has no items".to_string()));
        }
        Ok((lines, from_cart))
    }

    async fn record_side_effects(&self, order: &Order, order_id: &ObjectId) -> AppResult<()> {
        if let Some(applied) = &order.coupon {
            self.coupon_service
                .record_usage(&applied.coupon_id, &order.user_id, order_id)
                .await?;
        }

        let samples: Vec<ObjectId> = order
            .items
            .iter()
            .filter(|item| item.is_sample)
            .map(|item| item.product_id)
            .collect();
        if !samples.is_empty() {
            if let Err(e) = self
                .sample_service
                .record_for_order(&order.user_id, order_id, &samples)
                .await
            {
                if let Some(applied) = &order.coupon {
                    if let Err(revert) = self.coupon_service.revert_usage(&applied.coupon_id, order_id).await {
                        log::error!("Failed to revert coupon {}: {}", applied.code, revert);
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    async fn rollback(&self, order: &Order, order_id: &ObjectId) {
        self.product_repo.release_all(&stock_lines(&order.items)).await;
        if let Err(e) = self.sample_service.discard_for_order(order_id).await {
            log::error!("Failed to remove samples of order {}: {}", order_id, e);
        }
        if let Err(e) = self.order_repo.delete(order_id).await {
            log::error!("Failed to delete order {}: {}", order_id, e);
        }
    }

    pub async fn list_for_user(&self, user_id: &ObjectId) -> AppResult<Vec<OrderResponse>> {
        let orders = self.order_repo.list_for_user(user_id).await?;
        Ok(orders.into_iter().map(OrderResponse::from).collect())
    }

    async fn find(&self, id: &str) -> AppResult<Order> {
        let id = parse_object_id(id, "order")?;
        self.order_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::NotFound("order not found".to_string()))
    }

    /// Visible to its owner and to admins; anyone else sees a 404.
    pub async fn get_details(&self, actor: &AuthenticatedUser, id: &str) -> AppResult<OrderResponse> {
        let order = self.find(id).await?;
        if !actor.is_admin() && !order.is_owned_by(&actor.object_id()?) {
            return Err(AppError::NotFound("order not found".to_string()));
        }
        Ok(OrderResponse::from(order))
    }

    /// Customer cancellation; only allowed while the order has not shipped.
    /// Reserved stock goes back to the catalog and admins are notified.
    pub async fn cancel(&self, actor: &AuthenticatedUser, id: &str) -> AppResult<OrderResponse> {
        let order = self.find(id).await?;
        if !order.is_owned_by(&actor.object_id()?) {
            return Err(AppError::NotFound("order not found".to_string()));
        }
        if !order.order_status.cancellable_by_customer() {
            return Err(AppError::ValidationError(format!(
                "an order that is {} can no longer be cancelled",
                order.order_status.as_str()
            )));
        }

        let updated = self.apply_status(&order, OrderStatus::Cancelled).await?;

        self.notification_service.publish(AdminNotification::OrderCancelled {
            order_id: updated.id_string().unwrap_or_default(),
            customer_name: actor.user_name.clone(),
        });

        Ok(OrderResponse::from(updated))
    }

    pub async fn list_all(&self, query: &OrderListQuery) -> AppResult<Paginated<OrderResponse>> {
        let status = match query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => Some(OrderStatus::from_name(name).ok_or_else(|| {
                AppError::ValidationError(format!("unknown order status: {}", name))
            })?),
            None => None,
        };
        let window = PageQuery {
            page: query.page,
            limit: query.limit,
        }
        .window();

        let orders = self.order_repo.list(status, window).await?;
        Ok(orders.map(OrderResponse::from))
    }

    pub async fn get(&self, id: &str) -> AppResult<OrderResponse> {
        self.find(id).await.map(OrderResponse::from)
    }

    /// Back-office status change.
    ///
    /// Setting the current status again is a no-op. Stock follows the move:
    /// entering `cancelled` or `rejected` releases it, leaving them reserves it
    /// again.
    ///
    /// # Errors
    ///
    /// * `ValidationError` - `status` is not a known order status
    /// * `ConflictError` - not enough stock to reopen, or another admin changed
    ///   the order first
    pub async fn update_status(&self, id: &str, status: &str) -> AppResult<OrderResponse> {
        let to = OrderStatus::from_name(status)
            .ok_or_else(|| AppError::ValidationError(format!("unknown order status: {}", status)))?;
        let order = self.find(id).await?;
        if order.order_status == to {
            return Ok(OrderResponse::from(order));
        }

        let updated = self.apply_status(&order, to).await?;
        Ok(OrderResponse::from(updated))
    }

    /// Moves `order` to `to` together with its stock and samples.
    async fn apply_status(&self, order: &Order, to: OrderStatus) -> AppResult<Order> {
        let order_id = order
            .id
            .ok_or_else(|| AppError::InternalError("order without id".to_string()))?;
        let from = order.order_status;
        let lines = stock_lines(&order.items);
        let effect = OrderStatus::stock_effect(from, to);

        if effect == StockEffect::Reserve {
            if let Err(product_id) = self.product_repo.reserve_all(&lines).await? {
                let title = order
                    .items
                    .iter()
                    .find(|item| item.product_id == product_id)
                    .map(|item| item.title.as_str())
                    .unwrap_or("a product");
                return Err(AppError::ConflictError(format!(
                    "not enough stock of {} to reopen this order",
                    title
                )));
            }
        }

        let updated = match self
            .order_repo
            .transition_status(&order_id, from, to, status_side_fields(order, to))
            .await
        {
            Ok(Some(updated)) => updated,
            Ok(None) => {
                if effect == StockEffect::Reserve {
                    self.product_repo.release_all(&lines).await;
                }
                return Err(AppError::ConflictError(
                    "order was changed by someone else, reload and try again".to_string(),
                ));
            }
            Err(e) => {
                if effect == StockEffect::Reserve {
                    self.product_repo.release_all(&lines).await;
                }
                return Err(e);
            }
        };

        if effect == StockEffect::Release {
            self.product_repo.release_all(&lines).await;
        }

        if order.items.iter().any(|item| item.is_sample) {
            if let Err(e) = self.sample_service.sync_with_order(&order_id, sample_status_for(to)).await {
                log::warn!("Samples of order {} not updated: {}", order_id, e);
            }
        }

        log::info!("Order {} moved from {} to {}", order_id, from.as_str(), to.as_str());
        Ok(updated)
    }

    pub async fn update_payment_status(&self, id: &str, status: PaymentStatus) -> AppResult<OrderResponse> {
        let mut fields = doc! { "payment.status": status.as_str() };
        match status {
            PaymentStatus::Paid => {
                fields.insert("payment.paid_at", DateTime::now());
            }
            PaymentStatus::Rejected => {}
            _ => {
                return Err(AppError::ValidationError(
                    "payment status must be paid or rejected".to_string(),
                ));
            }
        }

        let id = parse_object_id(id, "order")?;
        let updated = self
            .order_repo
            .update_fields(&id, fields)
            .await?
            .ok_or_else(|| AppError::NotFound("order not found".to_string()))?;

        log::info!("Payment of order {} marked {}", id, status.as_str());
        Ok(OrderResponse::from(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::orders::OrderAddress;
    use crate::domain::entities::products::product::fixtures::product;

    fn order_with(method: PaymentMethod, status: PaymentStatus) -> Order {
        Order {
            id: Some(ObjectId::new()),
            user_id: ObjectId::new(),
            items: vec![],
            address: OrderAddress {
                full_name: "Noura Saleh".to_string(),
                address: "King Fahd Rd 12".to_string(),
                city: "Riyadh".to_string(),
                postal_code: "12211".to_string(),
                phone: "+966500000000".to_string(),
                notes: None,
            },
            subtotal: 0.0,
            shipping_fee: 0.0,
            discount: 0.0,
            total: 0.0,
            coupon: None,
            payment: Payment {
                method,
                status,
                proof: None,
                transfer_reference: None,
                paid_at: None,
            },
            order_status: OrderStatus::InShipping,
            created_at: DateTime::now(),
            updated_at: DateTime::now(),
        }
    }

    #[test]
    fn test_merge_lines_sums_duplicates() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        let merged = merge_lines(vec![(a, 1), (b, 2), (a, 3)]);
        assert_eq!(merged, vec![(a, 4), (b, 2)]);
    }

    #[test]
    fn test_delivered_cod_order_is_paid() {
        let cod = order_with(PaymentMethod::Cod, PaymentStatus::Pending);
        let fields = status_side_fields(&cod, OrderStatus::Delivered);
        assert_eq!(fields.get_str("payment.status").unwrap(), "paid");
        assert!(fields.contains_key("payment.paid_at"));

        assert!(status_side_fields(&cod, OrderStatus::Confirmed).is_empty());

        let transfer = order_with(PaymentMethod::BankTransfer, PaymentStatus::AwaitingVerification);
        assert!(status_side_fields(&transfer, OrderStatus::Delivered).is_empty());
    }

    #[test]
    fn test_sample_status_follows_order() {
        assert_eq!(sample_status_for(OrderStatus::Pending), SampleStatus::Pending);
        assert_eq!(sample_status_for(OrderStatus::InProcess), SampleStatus::Approved);
        assert_eq!(sample_status_for(OrderStatus::Delivered), SampleStatus::Shipped);
        assert_eq!(sample_status_for(OrderStatus::Cancelled), SampleStatus::Rejected);
    }

    #[test]
    fn test_order_line_uses_sale_price() {
        let mut perfume = product("Musk Tahara", 200.0, 5);
        perfume.sale_price = 150.0;

        let line = order_line(perfume.id.unwrap(), &perfume, 2);
        assert_eq!(line.price, 150.0);
        assert_eq!(line.quantity, 2);
        assert!(!line.is_sample);
    }

    #[test]
    fn test_into_samples_requires_offer_and_forces_one_free_unit() {
        let mut offered = product("Amber Nights", 180.0, 10);
        offered.sample_available = true;
        let not_offered = product("Rose Oud", 240.0, 10);

        let mut products = HashMap::new();
        products.insert(offered.id.unwrap(), offered.clone());
        products.insert(not_offered.id.unwrap(), not_offered.clone());

        let samples = into_samples(vec![order_line(offered.id.unwrap(), &offered, 3)], &products).unwrap();
        assert_eq!(samples[0].quantity, 1);
        assert_eq!(samples[0].price, 0.0);
        assert!(samples[0].is_sample);

        let error = into_samples(vec![order_line(not_offered.id.unwrap(), &not_offered, 1)], &products).unwrap_err();
        assert!(matches!(error, AppError::ValidationError(_)));
    }
}
