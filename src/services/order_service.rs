use crate::entities::{
    OrderStatus, Role, menu_item_entity as menu_items, order_entity as orders,
    order_item_entity as order_items, student_entity as students, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Select, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

/// 已解析的订单行，单价为下单时的快照
#[derive(Debug, Clone)]
struct ResolvedLine {
    menu_item_id: Uuid,
    name: String,
    quantity: i32,
    unit_price: Decimal,
}

impl ResolvedLine {
    fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

fn order_total(lines: &[ResolvedLine]) -> Decimal {
    lines.iter().map(ResolvedLine::subtotal).sum()
}

/// Rejects malformed requests before any transaction is opened.
fn validate_order_request(request: &CreateOrderRequest) -> AppResult<()> {
    if request.items.is_empty() {
        return Err(AppError::ValidationError(
            "An order must contain at least one item".to_string(),
        ));
    }
    if request.student_id.trim().is_empty() {
        return Err(AppError::ValidationError("student_id is required".to_string()));
    }
    if request
        .items
        .iter()
        .any(|item| item.menu_item_id.trim().is_empty() || item.quantity <= 0)
    {
        return Err(AppError::ValidationError(
            "Each item must have a menu_item_id and a quantity greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn parse_order_id(order_id: &str) -> AppResult<Uuid> {
    Uuid::parse_str(order_id.trim()).map_err(|_| AppError::NotFound("Order not found".to_string()))
}

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
}

impl OrderService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 下单
    ///
    /// 逻辑（单个事务内完成，任一步失败则整体回滚）:
    /// 1. 校验学生归属于当前监护人
    /// 2. 逐行读取菜品名称、价格、是否可售，累计总价
    /// 3. 锁定监护人记录并校验余额
    /// 4. 写入订单头（PENDING）
    /// 5. 写入订单明细（使用第 2 步的价格快照）
    /// 6. 按总价相对扣减余额
    /// 7. 提交
    pub async fn place_order(
        &self,
        guardian_id: Uuid,
        request: CreateOrderRequest,
    ) -> AppResult<OrderResponse> {
        validate_order_request(&request)?;

        log::info!(
            "User {guardian_id} placing order for student {} with {} line(s)",
            request.student_id,
            request.items.len()
        );

        let txn = self.pool.begin().await?;

        match Self::place_order_in(&txn, guardian_id, &request).await {
            Ok(order) => {
                txn.commit().await.map_err(AppError::CommitError)?;
                log::info!(
                    "Order {} created for user {guardian_id}, student {}, total {}",
                    order.id,
                    request.student_id,
                    order.total_amount
                );
                Ok(order)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    log::error!("Failed to roll back order for user {guardian_id}: {rollback_err}");
                }
                log::warn!("Order for user {guardian_id} rejected: {e}");
                Err(e)
            }
        }
    }

    async fn place_order_in(
        txn: &DatabaseTransaction,
        guardian_id: Uuid,
        request: &CreateOrderRequest,
    ) -> AppResult<OrderResponse> {
        let student_id = Self::verify_student_owner(txn, guardian_id, &request.student_id).await?;

        let lines = Self::resolve_lines(txn, &request.items).await?;
        let total = order_total(&lines);

        Self::ensure_funds(txn, guardian_id, total).await?;

        let now = Utc::now();
        let order = orders::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(guardian_id),
            student_id: Set(Some(student_id)),
            order_date: Set(now),
            total_amount: Set(total),
            status: Set(OrderStatus::Pending),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await?;

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let item = order_items::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order.id),
                menu_item_id: Set(line.menu_item_id),
                quantity: Set(line.quantity),
                price_at_purchase: Set(line.unit_price),
                created_at: Set(now),
            }
            .insert(txn)
            .await?;

            items.push(OrderLineResponse {
                id: item.id,
                order_id: item.order_id,
                menu_item_id: item.menu_item_id,
                menu_item_name: line.name,
                quantity: item.quantity,
                price_at_purchase: item.price_at_purchase,
                created_at: item.created_at,
            });
        }

        Self::debit_credits(txn, guardian_id, total).await?;

        Ok(OrderResponse::from_model(order, items))
    }

    async fn verify_student_owner(
        txn: &DatabaseTransaction,
        guardian_id: Uuid,
        student_id: &str,
    ) -> AppResult<Uuid> {
        let student_id =
            Uuid::parse_str(student_id.trim()).map_err(|_| AppError::OwnershipViolation)?;

        let student = students::Entity::find()
            .filter(students::Column::Id.eq(student_id))
            .filter(students::Column::ParentUserId.eq(guardian_id))
            .one(txn)
            .await?;

        match student {
            Some(s) => Ok(s.id),
            None => {
                log::warn!("Student {student_id} not found or not owned by user {guardian_id}");
                Err(AppError::OwnershipViolation)
            }
        }
    }

    async fn resolve_lines(
        txn: &DatabaseTransaction,
        requested: &[OrderItemRequest],
    ) -> AppResult<Vec<ResolvedLine>> {
        let mut lines = Vec::with_capacity(requested.len());

        for item in requested {
            let raw_id = item.menu_item_id.trim();
            let menu_item_id = Uuid::parse_str(raw_id)
                .map_err(|_| AppError::ItemNotFound(raw_id.to_string()))?;

            let menu_item = menu_items::Entity::find_by_id(menu_item_id)
                .one(txn)
                .await?
                .ok_or_else(|| AppError::ItemNotFound(raw_id.to_string()))?;

            if !menu_item.is_available {
                return Err(AppError::ItemUnavailable(menu_item.name));
            }

            lines.push(ResolvedLine {
                menu_item_id,
                name: menu_item.name,
                quantity: item.quantity,
                unit_price: menu_item.price,
            });
        }

        Ok(lines)
    }

    /// 加锁读取余额（SELECT ... FOR UPDATE），同一监护人的并发下单在此串行化
    async fn ensure_funds(
        txn: &DatabaseTransaction,
        guardian_id: Uuid,
        total: Decimal,
    ) -> AppResult<()> {
        let guardian = users::Entity::find_by_id(guardian_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_else(|| AppError::AuthError("User profile not found".to_string()))?;

        if guardian.credits < total {
            return Err(AppError::InsufficientFunds {
                required: total,
                available: guardian.credits,
            });
        }

        Ok(())
    }

    async fn debit_credits(
        txn: &DatabaseTransaction,
        guardian_id: Uuid,
        amount: Decimal,
    ) -> AppResult<()> {
        let result = users::Entity::update_many()
            .col_expr(
                users::Column::Credits,
                Expr::col(users::Column::Credits).sub(amount),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(guardian_id))
            .exec(txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::DatabaseError(DbErr::RecordNotUpdated));
        }

        Ok(())
    }

    /// 更新订单状态（仅员工 / 管理员）
    pub async fn update_status(
        &self,
        order_id: &str,
        request: UpdateOrderStatusRequest,
        requesting_role: Role,
    ) -> AppResult<OrderResponse> {
        if !requesting_role.is_staff_or_above() {
            return Err(AppError::PermissionDenied);
        }

        let raw_status = request.status.trim();
        if raw_status.is_empty() {
            return Err(AppError::ValidationError(
                "Status cannot be empty".to_string(),
            ));
        }
        let status: OrderStatus = raw_status.parse().map_err(AppError::ValidationError)?;
        let order_id = parse_order_id(order_id)?;

        log::info!("Role {requesting_role} updating order {order_id} to {status}");

        let result = orders::Entity::update_many()
            .col_expr(orders::Column::Status, Expr::value(status))
            .col_expr(orders::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(orders::Column::Id.eq(order_id))
            .exec(&self.pool)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Order not found".to_string()));
        }

        self.load_order(order_id).await
    }

    /// 获取单个订单（本人或员工及以上）
    pub async fn get_order(
        &self,
        order_id: &str,
        requester_id: Uuid,
        requesting_role: Role,
    ) -> AppResult<OrderResponse> {
        let order_id = parse_order_id(order_id)?;
        let order = self.load_order(order_id).await?;

        if !requesting_role.is_staff_or_above() && order.user_id != requester_id {
            log::warn!(
                "User {requester_id} ({requesting_role}) denied access to order {order_id} owned by {}",
                order.user_id
            );
            return Err(AppError::PermissionDenied);
        }

        Ok(order)
    }

    /// 订单列表（员工 / 管理员）
    ///
    /// 管理员可按任意状态过滤；员工只能看到未完结（PENDING / PREPARING / READY）的订单，
    /// 过滤条件超出该范围时返回空列表。
    pub async fn list_orders(
        &self,
        requesting_role: Role,
        query: &OrderListQuery,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        if !requesting_role.is_staff_or_above() {
            return Err(AppError::PermissionDenied);
        }

        let status_filter = query
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<OrderStatus>().map_err(AppError::ValidationError))
            .transpose()?;

        let params = PaginationParams::new(query.page, query.per_page);
        let mut select = orders::Entity::find();

        if requesting_role.is_admin() {
            if let Some(status) = status_filter {
                select = select.filter(orders::Column::Status.eq(status));
            }
        } else {
            match status_filter {
                Some(status) if OrderStatus::STAFF_VISIBLE.contains(&status) => {
                    select = select.filter(orders::Column::Status.eq(status));
                }
                Some(_) => return Ok(PaginatedResponse::empty(&params)),
                None => {
                    select = select.filter(orders::Column::Status.is_in(OrderStatus::STAFF_VISIBLE));
                }
            }
        }

        self.paginate_with_lines(select, &params).await
    }

    /// 当前用户自己的订单
    pub async fn list_my_orders(
        &self,
        user_id: Uuid,
        query: &MyOrdersQuery,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let select = orders::Entity::find().filter(orders::Column::UserId.eq(user_id));

        self.paginate_with_lines(select, &params).await
    }

    async fn load_order(&self, order_id: Uuid) -> AppResult<OrderResponse> {
        let order = orders::Entity::find_by_id(order_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

        let items = fetch_lines(&self.pool, &[order.id]).await?;
        Ok(OrderResponse::from_model(order, items))
    }

    async fn paginate_with_lines(
        &self,
        select: Select<orders::Entity>,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        let total = select.clone().count(&self.pool).await? as i64;

        let models = select
            .order_by_desc(orders::Column::OrderDate)
            .order_by_desc(orders::Column::CreatedAt)
            .limit(params.get_limit() as u64)
            .offset(params.get_offset() as u64)
            .all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut lines_by_order: HashMap<Uuid, Vec<OrderLineResponse>> = HashMap::new();
        for line in fetch_lines(&self.pool, &ids).await? {
            lines_by_order.entry(line.order_id).or_default().push(line);
        }

        let items = models
            .into_iter()
            .map(|m| {
                let lines = lines_by_order.remove(&m.id).unwrap_or_default();
                OrderResponse::from_model(m, lines)
            })
            .collect();

        Ok(PaginatedResponse::new(
            items,
            params.get_page(),
            params.get_limit(),
            total,
        ))
    }
}

/// 查询订单明细，并关联 menu_items 取菜品名称
async fn fetch_lines<C: ConnectionTrait>(
    db: &C,
    order_ids: &[Uuid],
) -> AppResult<Vec<OrderLineResponse>> {
    if order_ids.is_empty() {
        return Ok(Vec::new());
    }

    let lines = order_items::Entity::find()
        .select_only()
        .column(order_items::Column::Id)
        .column(order_items::Column::OrderId)
        .column(order_items::Column::MenuItemId)
        .column_as(menu_items::Column::Name, "menu_item_name")
        .column(order_items::Column::Quantity)
        .column(order_items::Column::PriceAtPurchase)
        .column(order_items::Column::CreatedAt)
        .join(JoinType::InnerJoin, order_items::Relation::MenuItem.def())
        .filter(order_items::Column::OrderId.is_in(order_ids.iter().copied()))
        .order_by_asc(order_items::Column::CreatedAt)
        .into_model::<OrderLineResponse>()
        .all(db)
        .await?;

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price: Decimal, quantity: i32) -> ResolvedLine {
        ResolvedLine {
            menu_item_id: Uuid::new_v4(),
            name: "item".to_string(),
            quantity,
            unit_price: price,
        }
    }

    fn item(menu_item_id: &str, quantity: i32) -> OrderItemRequest {
        OrderItemRequest {
            menu_item_id: menu_item_id.to_string(),
            quantity,
        }
    }

    #[test]
    fn test_order_total() {
        let lines = vec![line(Decimal::new(500, 2), 2), line(Decimal::new(350, 2), 1)];
        assert_eq!(order_total(&lines), Decimal::new(1350, 2));
    }

    #[test]
    fn test_order_total_has_no_float_drift() {
        let lines: Vec<ResolvedLine> = (0..1000).map(|_| line(Decimal::new(10, 2), 1)).collect();
        assert_eq!(order_total(&lines), Decimal::new(10000, 2));
    }

    #[test]
    fn test_validate_rejects_empty_items() {
        let request = CreateOrderRequest {
            items: vec![],
            student_id: Uuid::new_v4().to_string(),
        };
        assert!(matches!(
            validate_order_request(&request),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_student() {
        let request = CreateOrderRequest {
            items: vec![item(&Uuid::new_v4().to_string(), 1)],
            student_id: "  ".to_string(),
        };
        assert!(matches!(
            validate_order_request(&request),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_lines() {
        let student_id = Uuid::new_v4().to_string();
        for bad in [item("", 1), item(&Uuid::new_v4().to_string(), 0), item("x", -3)] {
            let request = CreateOrderRequest {
                items: vec![item(&Uuid::new_v4().to_string(), 1), bad],
                student_id: student_id.clone(),
            };
            assert!(matches!(
                validate_order_request(&request),
                Err(AppError::ValidationError(_))
            ));
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_request() {
        let request = CreateOrderRequest {
            items: vec![item(&Uuid::new_v4().to_string(), 2)],
            student_id: Uuid::new_v4().to_string(),
        };
        assert!(validate_order_request(&request).is_ok());
    }

    #[test]
    fn test_parse_order_id() {
        assert!(parse_order_id(&Uuid::new_v4().to_string()).is_ok());
        assert!(matches!(
            parse_order_id("not-a-uuid"),
            Err(AppError::NotFound(_))
        ));
    }
}
