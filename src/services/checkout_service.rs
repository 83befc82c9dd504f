// src/services/checkout_service.rs

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        basket::{Basket, NewBasket},
        product::Product,
        sale::{
            BarcodeSaleReceipt, NewSale, Sale, SaleStatus, StartSaleBarcodeRequest,
            StartSaleRequest,
        },
        staff::Staff,
        storage::{NewStorageTransaction, Storage, StorageTransaction, StorageTransactionType},
        tarif::Tarif,
        transaction::{NewTransaction, Transaction, TransactionSource, TransactionType},
    },
    services::commission::commission,
};

// ---
// Porta transacional do checkout
// ---
// Tudo que o checkout faz passa por uma `CheckoutTx`. Se ela for descartada
// sem `commit`, nada do que foi feito fica valendo.
#[async_trait]
pub trait CheckoutStore: Send + Sync + 'static {
    type Tx: CheckoutTx;

    async fn begin(&self) -> Result<Self::Tx, AppError>;
}

#[async_trait]
pub trait CheckoutTx: Send {
    async fn create_sale(&mut self, draft: &NewSale) -> Result<Sale, AppError>;
    async fn lock_sale(&mut self, id: Uuid) -> Result<Option<Sale>, AppError>;
    async fn finish_sale(&mut self, id: Uuid, price: Decimal) -> Result<Sale, AppError>;

    async fn find_product(&mut self, id: Uuid) -> Result<Option<Product>, AppError>;
    async fn find_product_by_barcode(&mut self, barcode: &str)
        -> Result<Option<Product>, AppError>;

    /// Trava o estoque de (produto, filial) até o fim da transação.
    async fn lock_storage(
        &mut self,
        product_id: Uuid,
        branch_id: Uuid,
    ) -> Result<Option<Storage>, AppError>;
    /// Só baixa se `count >= quantity`; `None` quando não baixou.
    async fn decrement_storage(
        &mut self,
        storage_id: Uuid,
        quantity: i32,
    ) -> Result<Option<Storage>, AppError>;
    async fn record_storage_transaction(
        &mut self,
        draft: &NewStorageTransaction,
    ) -> Result<StorageTransaction, AppError>;

    async fn add_basket(&mut self, draft: &NewBasket) -> Result<Basket, AppError>;

    async fn find_staff(&mut self, id: Uuid) -> Result<Option<Staff>, AppError>;
    async fn find_tarif(&mut self, id: Uuid) -> Result<Option<Tarif>, AppError>;
    async fn credit_balance(&mut self, staff_id: Uuid, amount: Decimal) -> Result<(), AppError>;
    async fn record_transaction(&mut self, draft: &NewTransaction)
        -> Result<Transaction, AppError>;

    async fn commit(self) -> Result<(), AppError>;
}

// Quem está vendendo e onde (vem do funcionário autenticado).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleContext {
    pub cashier_id: Uuid,
    pub branch_id: Uuid,
}

pub struct CheckoutService<S> {
    store: Arc<S>,
}

impl<S> Clone for CheckoutService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: CheckoutStore> CheckoutService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    // --- START SALE ---
    // Cria a venda, processa os itens na ordem recebida, fecha o total e paga
    // as comissões. Tudo numa transação só.
    pub async fn start_sale(
        &self,
        ctx: SaleContext,
        request: StartSaleRequest,
    ) -> Result<Sale, AppError> {
        let mut tx = self.store.begin().await?;

        if let Some(assistant_id) = request.shop_assistant_id {
            let assistant = tx
                .find_staff(assistant_id)
                .await?
                .ok_or(AppError::NotFound("Funcionário"))?;
            if assistant.branch_id != ctx.branch_id {
                return Err(AppError::BadRequest(format!(
                    "Funcionário {assistant_id} não é desta filial."
                )));
            }
        }

        let sale = tx
            .create_sale(&NewSale {
                branch_id: ctx.branch_id,
                cashier_id: ctx.cashier_id,
                shop_assistant_id: request.shop_assistant_id,
                payment_type: request.payment_type,
                client_name: request.client_name,
            })
            .await?;

        // Trava os estoques sempre na mesma ordem (id do produto) antes de mexer neles.
        let mut product_ids: Vec<Uuid> = request.items.iter().map(|i| i.product_id).collect();
        product_ids.sort();
        product_ids.dedup();
        for product_id in product_ids {
            tx.lock_storage(product_id, ctx.branch_id).await?;
        }

        let mut total = Decimal::ZERO;
        for item in &request.items {
            let product = tx
                .find_product(item.product_id)
                .await?
                .ok_or_else(|| AppError::ProductNotFound(item.product_id.to_string()))?;

            total += sell_line(&mut tx, &sale, &product, item.quantity).await?;
        }

        let sale = tx.finish_sale(sale.id, total).await?;
        pay_commissions(&mut tx, &sale, None).await?;

        tx.commit().await?;

        tracing::info!(
            "🛒 Venda {} concluída: {} item(ns), total {}",
            sale.id,
            request.items.len(),
            sale.price
        );
        Ok(sale)
    }

    // --- START SALE BARCODE ---
    // Acrescenta um item (pelo código de barras) a uma venda existente.
    pub async fn start_sale_barcode(
        &self,
        ctx: SaleContext,
        request: StartSaleBarcodeRequest,
    ) -> Result<BarcodeSaleReceipt, AppError> {
        let mut tx = self.store.begin().await?;

        let sale = tx
            .lock_sale(request.sale_id)
            .await?
            .filter(|s| s.branch_id == ctx.branch_id)
            .ok_or(AppError::NotFound("Venda"))?;

        let product = tx
            .find_product_by_barcode(&request.barcode)
            .await?
            .ok_or_else(|| AppError::ProductNotFound(request.barcode.clone()))?;

        let line_price = sell_line(&mut tx, &sale, &product, request.quantity).await?;

        // Venda já fechada: o total anterior já foi comissionado.
        let previous_total = (sale.status == SaleStatus::Success).then_some(sale.price);
        let sale = tx.finish_sale(sale.id, sale.price + line_price).await?;
        pay_commissions(&mut tx, &sale, previous_total).await?;

        tx.commit().await?;

        tracing::info!(
            "🛒 Venda {}: +{} x '{}', total {}",
            sale.id,
            request.quantity,
            product.name,
            sale.price
        );

        Ok(BarcodeSaleReceipt {
            product_name: product.name,
            product_quantity: request.quantity,
            product_price: product.price,
            total_sum: line_price,
        })
    }
}

// Um item: confere o estoque, cria o cesto, baixa o estoque e registra a saída.
// Retorna o preço da linha.
async fn sell_line<T: CheckoutTx>(
    tx: &mut T,
    sale: &Sale,
    product: &Product,
    quantity: i32,
) -> Result<Decimal, AppError> {
    let insufficient = |available: i32| AppError::InsufficientStock {
        product: product.name.clone(),
        available,
        requested: quantity,
    };

    let storage = tx
        .lock_storage(product.id, sale.branch_id)
        .await?
        .ok_or(AppError::InventoryNotFound {
            product_id: product.id,
            branch_id: sale.branch_id,
        })?;

    if quantity > storage.count {
        return Err(insufficient(storage.count));
    }

    let price = product.price * Decimal::from(quantity);

    tx.add_basket(&NewBasket {
        sale_id: sale.id,
        product_id: product.id,
        quantity,
        price,
    })
    .await?;

    tx.decrement_storage(storage.id, quantity)
        .await?
        .ok_or_else(|| insufficient(storage.count))?;

    tx.record_storage_transaction(&NewStorageTransaction {
        staff_id: sale.cashier_id,
        product_id: product.id,
        branch_id: sale.branch_id,
        storage_transaction_type: StorageTransactionType::Minus,
        price,
        quantity,
    })
    .await?;

    Ok(price)
}

// Comissões sobre `sale.price`. Com `previous_total`, paga só a diferença entre a
// comissão do total novo e a do total já comissionado.
async fn pay_commissions<T: CheckoutTx>(
    tx: &mut T,
    sale: &Sale,
    previous_total: Option<Decimal>,
) -> Result<(), AppError> {
    // Créditos em ordem de id, mesma regra dos estoques.
    let mut staff_ids: Vec<Uuid> = std::iter::once(sale.cashier_id)
        .chain(sale.shop_assistant_id)
        .collect();
    staff_ids.sort();

    for staff_id in staff_ids {
        pay_commission(tx, sale, staff_id, previous_total).await?;
    }
    Ok(())
}

async fn pay_commission<T: CheckoutTx>(
    tx: &mut T,
    sale: &Sale,
    staff_id: Uuid,
    previous_total: Option<Decimal>,
) -> Result<Decimal, AppError> {
    let staff = tx
        .find_staff(staff_id)
        .await?
        .ok_or(AppError::NotFound("Funcionário"))?;
    let tarif = tx
        .find_tarif(staff.tarif_id)
        .await?
        .ok_or(AppError::NotFound("Tarifa"))?;

    let amount = match previous_total {
        Some(previous) => {
            commission(&tarif, sale.payment_type, sale.price)?
                - commission(&tarif, sale.payment_type, previous)?
        }
        None => commission(&tarif, sale.payment_type, sale.price)?,
    };

    // Tarifa fixa não paga de novo quando a venda só cresce.
    if previous_total.is_some() && amount.is_zero() {
        return Ok(amount);
    }

    tx.credit_balance(staff.id, amount).await?;
    tx.record_transaction(&NewTransaction {
        sale_id: Some(sale.id),
        staff_id: staff.id,
        transaction_type: TransactionType::Topup,
        source_type: TransactionSource::Sales,
        amount,
        description: format!("Comissão da venda {}", sale.id),
    })
    .await?;

    Ok(amount)
}
