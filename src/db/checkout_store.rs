// src/db/checkout_store.rs

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction as PgTransaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        crud_repo::{fetch_by_id, Entity},
        sales_repo, storage_repo, StaffRepository,
    },
    models::{
        basket::{Basket, NewBasket},
        product::Product,
        sale::{NewSale, Sale},
        staff::Staff,
        storage::{NewStorageTransaction, Storage, StorageTransaction},
        tarif::Tarif,
        transaction::{NewTransaction, Transaction},
    },
    services::checkout_service::{CheckoutStore, CheckoutTx},
};

// O checkout no Postgres: uma transação (read committed) por venda.
#[derive(Clone)]
pub struct PgCheckoutStore {
    pool: PgPool,
}

impl PgCheckoutStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

pub struct PgCheckoutTx {
    tx: PgTransaction<'static, Postgres>,
}

#[async_trait]
impl CheckoutStore for PgCheckoutStore {
    type Tx = PgCheckoutTx;

    async fn begin(&self) -> Result<PgCheckoutTx, AppError> {
        let tx = self.pool.begin().await?;
        Ok(PgCheckoutTx { tx })
    }
}

// Cada operação roda em `&mut *self.tx`; se o PgCheckoutTx for descartado sem
// commit (erro, timeout da requisição), o sqlx faz o rollback.
#[async_trait]
impl CheckoutTx for PgCheckoutTx {
    async fn create_sale(&mut self, draft: &NewSale) -> Result<Sale, AppError> {
        Ok(Sale::insert(draft).fetch_one(&mut *self.tx).await?)
    }

    async fn lock_sale(&mut self, id: Uuid) -> Result<Option<Sale>, AppError> {
        sales_repo::lock_sale(&mut *self.tx, id).await
    }

    async fn finish_sale(&mut self, id: Uuid, price: Decimal) -> Result<Sale, AppError> {
        sales_repo::finish_sale(&mut *self.tx, id, price).await
    }

    async fn find_product(&mut self, id: Uuid) -> Result<Option<Product>, AppError> {
        fetch_by_id::<Product, _>(&mut *self.tx, id).await
    }

    async fn find_product_by_barcode(
        &mut self,
        barcode: &str,
    ) -> Result<Option<Product>, AppError> {
        storage_repo::find_product_by_barcode(&mut *self.tx, barcode).await
    }

    async fn lock_storage(
        &mut self,
        product_id: Uuid,
        branch_id: Uuid,
    ) -> Result<Option<Storage>, AppError> {
        storage_repo::lock_storage(&mut *self.tx, product_id, branch_id).await
    }

    async fn decrement_storage(
        &mut self,
        storage_id: Uuid,
        quantity: i32,
    ) -> Result<Option<Storage>, AppError> {
        storage_repo::decrement_storage(&mut *self.tx, storage_id, quantity).await
    }

    async fn record_storage_transaction(
        &mut self,
        draft: &NewStorageTransaction,
    ) -> Result<StorageTransaction, AppError> {
        Ok(StorageTransaction::insert(draft)
            .fetch_one(&mut *self.tx)
            .await?)
    }

    async fn add_basket(&mut self, draft: &NewBasket) -> Result<Basket, AppError> {
        Ok(Basket::insert(draft).fetch_one(&mut *self.tx).await?)
    }

    async fn find_staff(&mut self, id: Uuid) -> Result<Option<Staff>, AppError> {
        fetch_by_id::<Staff, _>(&mut *self.tx, id).await
    }

    async fn find_tarif(&mut self, id: Uuid) -> Result<Option<Tarif>, AppError> {
        fetch_by_id::<Tarif, _>(&mut *self.tx, id).await
    }

    async fn credit_balance(&mut self, staff_id: Uuid, amount: Decimal) -> Result<(), AppError> {
        StaffRepository::credit_balance(&mut *self.tx, staff_id, amount).await
    }

    async fn record_transaction(
        &mut self,
        draft: &NewTransaction,
    ) -> Result<Transaction, AppError> {
        Ok(Transaction::insert(draft).fetch_one(&mut *self.tx).await?)
    }

    async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::CrudRepository,
        models::{
            branch::{Branch, CreateBranch},
            product::CreateProduct,
            sale::{LineItem, PaymentType, SaleStatus, StartSaleRequest},
            staff::{NewStaff, StaffRole},
            storage::CreateStorage,
            tarif::{CreateTarif, TarifType},
        },
        services::checkout_service::{CheckoutService, SaleContext},
    };

    // Uma filial, dois funcionários com bônus fixo de 1, leite (5 un) e pão (20 un).
    struct Seed {
        branch: Branch,
        ana: Staff,
        bia: Staff,
        milk: Product,
        bread: Product,
        milk_storage: Storage,
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    async fn seed(pool: &PgPool) -> Seed {
        let branch = CrudRepository::<Branch>::new(pool.clone())
            .create(&CreateBranch {
                name: "Matriz".into(),
                address: "Rua 1".into(),
            })
            .await
            .unwrap();
        let tarif = CrudRepository::<Tarif>::new(pool.clone())
            .create(&CreateTarif {
                name: "Bônus".into(),
                tarif_type: TarifType::Fixed,
                amount_for_cash: dec("1"),
                amount_for_card: dec("1"),
            })
            .await
            .unwrap();

        let staffs = CrudRepository::<Staff>::new(pool.clone());
        let hire = |name: &str| NewStaff {
            branch_id: branch.id,
            tarif_id: tarif.id,
            role: StaffRole::Cashier,
            name: name.into(),
            birth_date: None,
            gender: None,
            login: name.to_lowercase(),
            password_hash: "x".into(),
        };
        let ana = staffs.create(&hire("Ana")).await.unwrap();
        let bia = staffs.create(&hire("Bia")).await.unwrap();

        let products = CrudRepository::<Product>::new(pool.clone());
        let milk = products
            .create(&CreateProduct {
                name: "Leite".into(),
                price: dec("10.50"),
                barcode: "789001".into(),
                category_id: None,
            })
            .await
            .unwrap();
        let bread = products
            .create(&CreateProduct {
                name: "Pão".into(),
                price: dec("2.25"),
                barcode: "789002".into(),
                category_id: None,
            })
            .await
            .unwrap();

        let storages = CrudRepository::<Storage>::new(pool.clone());
        let milk_storage = storages
            .create(&CreateStorage {
                product_id: milk.id,
                branch_id: branch.id,
                count: 5,
            })
            .await
            .unwrap();
        storages
            .create(&CreateStorage {
                product_id: bread.id,
                branch_id: branch.id,
                count: 20,
            })
            .await
            .unwrap();

        Seed {
            branch,
            ana,
            bia,
            milk,
            bread,
            milk_storage,
        }
    }

    fn sale_of(product_id: Uuid, quantity: i32, assistant: Option<Uuid>) -> StartSaleRequest {
        StartSaleRequest {
            items: vec![LineItem {
                product_id,
                quantity,
            }],
            payment_type: PaymentType::Cash,
            client_name: None,
            shop_assistant_id: assistant,
        }
    }

    async fn count_of(pool: &PgPool, storage_id: Uuid) -> i32 {
        CrudRepository::<Storage>::new(pool.clone())
            .get_by_id(storage_id)
            .await
            .unwrap()
            .count
    }

    async fn balance_of(pool: &PgPool, staff_id: Uuid) -> Decimal {
        CrudRepository::<Staff>::new(pool.clone())
            .get_by_id(staff_id)
            .await
            .unwrap()
            .balance
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn conditional_decrement_never_goes_negative(pool: PgPool) {
        let seed = seed(&pool).await;
        let store = PgCheckoutStore::new(pool.clone());

        let mut tx = store.begin().await.unwrap();
        let storage = tx
            .lock_storage(seed.milk.id, seed.branch.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(storage.count, 5);

        let left = tx.decrement_storage(storage.id, 3).await.unwrap().unwrap();
        assert_eq!(left.count, 2);
        assert!(tx.decrement_storage(storage.id, 5).await.unwrap().is_none());
        tx.commit().await.unwrap();

        assert_eq!(count_of(&pool, storage.id).await, 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn dropped_transaction_rolls_back(pool: PgPool) {
        let seed = seed(&pool).await;
        let store = PgCheckoutStore::new(pool.clone());

        {
            let mut tx = store.begin().await.unwrap();
            tx.create_sale(&NewSale {
                branch_id: seed.branch.id,
                cashier_id: seed.ana.id,
                shop_assistant_id: None,
                payment_type: PaymentType::Cash,
                client_name: None,
            })
            .await
            .unwrap();
            tx.decrement_storage(seed.milk_storage.id, 5).await.unwrap();
            tx.credit_balance(seed.ana.id, dec("3")).await.unwrap();
        }

        let sales: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(sales, 0);
        assert_eq!(count_of(&pool, seed.milk_storage.id).await, 5);
        assert_eq!(balance_of(&pool, seed.ana.id).await, Decimal::ZERO);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn sale_rows_and_balances_round_trip(pool: PgPool) {
        let seed = seed(&pool).await;
        let store = PgCheckoutStore::new(pool.clone());

        let mut tx = store.begin().await.unwrap();
        let sale = tx
            .create_sale(&NewSale {
                branch_id: seed.branch.id,
                cashier_id: seed.ana.id,
                shop_assistant_id: Some(seed.bia.id),
                payment_type: PaymentType::Card,
                client_name: Some("Carla".into()),
            })
            .await
            .unwrap();
        assert_eq!(sale.status, SaleStatus::InProgress);
        assert_eq!(sale.price, Decimal::ZERO);

        let locked = tx.lock_sale(sale.id).await.unwrap().unwrap();
        assert_eq!(locked.id, sale.id);
        let found = tx.find_product_by_barcode("789002").await.unwrap().unwrap();
        assert_eq!(found.id, seed.bread.id);

        let finished = tx.finish_sale(sale.id, dec("12.75")).await.unwrap();
        assert_eq!(finished.status, SaleStatus::Success);
        assert_eq!(finished.price, dec("12.75"));

        tx.credit_balance(seed.bia.id, dec("0.64")).await.unwrap();
        let err = tx.credit_balance(Uuid::new_v4(), dec("1")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        tx.commit().await.unwrap();

        assert_eq!(balance_of(&pool, seed.bia.id).await, dec("0.64"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn checkout_against_postgres(pool: PgPool) {
        let seed = seed(&pool).await;
        let service = CheckoutService::new(PgCheckoutStore::new(pool.clone()));
        let ctx = SaleContext {
            cashier_id: seed.ana.id,
            branch_id: seed.branch.id,
        };

        let sale = service
            .start_sale(ctx, sale_of(seed.milk.id, 2, Some(seed.bia.id)))
            .await
            .unwrap();
        assert_eq!(sale.price, dec("21.00"));
        assert_eq!(count_of(&pool, seed.milk_storage.id).await, 3);
        assert_eq!(balance_of(&pool, seed.ana.id).await, dec("1"));
        assert_eq!(balance_of(&pool, seed.bia.id).await, dec("1"));

        // Estoque insuficiente: nada muda
        let err = service
            .start_sale(ctx, sale_of(seed.milk.id, 4, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InsufficientStock { available: 3, .. }));
        assert_eq!(count_of(&pool, seed.milk_storage.id).await, 3);
        assert_eq!(balance_of(&pool, seed.ana.id).await, dec("1"));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn crossed_sales_run_concurrently(pool: PgPool) {
        let seed = seed(&pool).await;
        let service = CheckoutService::new(PgCheckoutStore::new(pool.clone()));
        let sales_each = 5;

        // Ana vende leite com Bia de vendedora e vice-versa com pão:
        // estoques distintos, mesmos dois saldos.
        let mut handles = Vec::new();
        for _ in 0..sales_each {
            for (cashier, assistant, product) in [
                (seed.ana.id, seed.bia.id, seed.milk.id),
                (seed.bia.id, seed.ana.id, seed.bread.id),
            ] {
                let service = service.clone();
                let ctx = SaleContext {
                    cashier_id: cashier,
                    branch_id: seed.branch.id,
                };
                handles.push(tokio::spawn(async move {
                    service
                        .start_sale(ctx, sale_of(product, 1, Some(assistant)))
                        .await
                }));
            }
        }

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let total = Decimal::from(2 * sales_each);
        assert_eq!(balance_of(&pool, seed.ana.id).await, total);
        assert_eq!(balance_of(&pool, seed.bia.id).await, total);
        assert_eq!(count_of(&pool, seed.milk_storage.id).await, 0);
    }
}
