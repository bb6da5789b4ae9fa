//! [`Product`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Delete, Insert, Lock, Select, Update},
    Currency, Money,
};
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{product, Product},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `products` table, in the order [`from_row()`] expects.
const COLUMNS: &str = "\
    id, object, brand, model, description, precautions, quantity, \
    currency, price_per_day, price_per_week, caution_deposit, \
    created_at";

/// Builds a [`Product`] out of the provided `products` table [`Row`].
fn from_row(row: &Row) -> Product {
    let currency: Currency = row.get("currency");
    let money = |column: &str| Money {
        amount: row.get::<_, Decimal>(column),
        currency,
    };

    Product {
        id: row.get("id"),
        object: row.get("object"),
        brand: row.get("brand"),
        model: row.get("model"),
        description: row.get("description"),
        precautions: row.get("precautions"),
        quantity: u16::try_from(row.get::<_, i16>("quantity"))
            .ok()
            .and_then(product::Quantity::new)
            .expect("`quantity` is always positive"),
        price_per_day: money("price_per_day"),
        price_per_week: money("price_per_week"),
        caution_deposit: money("caution_deposit"),
        created_at: row.get("created_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<product::Id, Product>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[product::Id]>,
{
    type Ok = HashMap<product::Id, Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<product::Id, Product>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[product::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM products \
             WHERE id = ANY($1::UUID[])",
        );
        Ok(self
            .query(&sql, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .map(|p| (p.id, p))
            .collect())
    }
}

impl<C> Database<Select<By<Option<Product>, product::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<product::Id, Product>, [product::Id; 1]>>,
        Ok = HashMap<product::Id, Product>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Product>, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Vec<Product>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Product>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Product>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sql = format!(
            "SELECT {COLUMNS} \
             FROM products \
             ORDER BY created_at, id",
        );
        Ok(self
            .query(&sql, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Product>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Product>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(product): Insert<Product>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(product)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Product>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(product): Update<Product>,
    ) -> Result<Self::Ok, Self::Err> {
        let Product {
            id,
            object,
            brand,
            model,
            description,
            precautions,
            quantity,
            price_per_day,
            price_per_week,
            caution_deposit,
            created_at,
        } = product;

        let quantity = i16::try_from(u16::from(quantity))
            .expect("`quantity` overflow");

        const SQL: &str = "\
            INSERT INTO products (\
                id, object, brand, model, description, precautions, \
                quantity, \
                currency, price_per_day, price_per_week, caution_deposit, \
                created_at\
            ) VALUES (\
                $1::UUID, \
                $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, \
                $5::VARCHAR, $6::VARCHAR, \
                $7::INT2, \
                $8::INT2, $9::NUMERIC, $10::NUMERIC, $11::NUMERIC, \
                $12::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET object = EXCLUDED.object, \
                brand = EXCLUDED.brand, \
                model = EXCLUDED.model, \
                description = EXCLUDED.description, \
                precautions = EXCLUDED.precautions, \
                quantity = EXCLUDED.quantity, \
                currency = EXCLUDED.currency, \
                price_per_day = EXCLUDED.price_per_day, \
                price_per_week = EXCLUDED.price_per_week, \
                caution_deposit = EXCLUDED.caution_deposit";
        self.exec(
            SQL,
            &[
                &id,
                &object,
                &brand,
                &model,
                &description,
                &precautions,
                &quantity,
                &price_per_day.currency,
                &price_per_day.amount,
                &price_per_week.amount,
                &caution_deposit.amount,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Product, product::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Product, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: product::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM products \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|n| n > 0)
    }
}

impl<C> Database<Lock<By<Product, product::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Product, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: product::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM products \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
