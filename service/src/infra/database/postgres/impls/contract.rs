//! [`Contract`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{contract, product, Contract},
    engine::Window,
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Columns of the `contracts` table, in the order [`from_row()`] expects.
const COLUMNS: &str = "\
    id, product_id, user_id, quantity, \
    start_date, end_date, \
    total_price, currency, status, \
    state_before, state_after, \
    created_at";

/// Builds a [`Contract`] out of the provided `contracts` table [`Row`].
fn from_row(row: &Row) -> Contract {
    Contract {
        id: row.get("id"),
        product_id: row.get("product_id"),
        user_id: row.get("user_id"),
        quantity: u16::try_from(row.get::<_, i16>("quantity"))
            .ok()
            .and_then(product::Quantity::new)
            .expect("`quantity` is always positive"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        total_price: Money {
            amount: row.get::<_, Decimal>("total_price"),
            currency: row.get("currency"),
        },
        status: row.get("status"),
        state_before: row.get("state_before"),
        state_after: row.get("state_after"),
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Option<Contract>, contract::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: contract::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM contracts \
             WHERE id = $1::UUID \
             LIMIT 1",
        );
        self.query_opt(&sql, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Contract>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<Contract>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        let sql = format!(
            "SELECT {COLUMNS} \
             FROM contracts \
             ORDER BY start_date, id",
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

impl<C> Database<Select<By<Vec<Contract>, Window>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, Window>>,
    ) -> Result<Self::Ok, Self::Err> {
        let window = by.into_inner();
        let (start, end) = (window.start(), window.end());

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM contracts \
             WHERE start_date < $2::TIMESTAMPTZ \
               AND end_date > $1::TIMESTAMPTZ \
             ORDER BY start_date, id",
        );
        Ok(self
            .query(&sql, &[&start, &end])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<Contract>, product::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, product::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let product_id: product::Id = by.into_inner();

        let sql = format!(
            "SELECT {COLUMNS} \
             FROM contracts \
             WHERE product_id = $1::UUID \
             ORDER BY start_date, id",
        );
        Ok(self
            .query(&sql, &[&product_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Contract>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Contract>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(contract): Insert<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(contract))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Contract>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(contract): Update<Contract>,
    ) -> Result<Self::Ok, Self::Err> {
        let Contract {
            id,
            product_id,
            user_id,
            quantity,
            start_date,
            end_date,
            total_price,
            status,
            state_before,
            state_after,
            created_at,
        } = contract;

        let quantity = i16::try_from(u16::from(quantity))
            .expect("`quantity` overflow");

        // `total_price` is fixed once the row exists.
        const SQL: &str = "\
            INSERT INTO contracts (\
                id, product_id, user_id, quantity, \
                start_date, end_date, \
                total_price, currency, status, \
                state_before, state_after, \
                created_at\
            ) VALUES (\
                $1::UUID, $2::UUID, $3::UUID, $4::INT2, \
                $5::TIMESTAMPTZ, $6::TIMESTAMPTZ, \
                $7::NUMERIC, $8::INT2, $9::VARCHAR, \
                $10::VARCHAR, $11::VARCHAR, \
                $12::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET status = EXCLUDED.status, \
                state_before = EXCLUDED.state_before, \
                state_after = EXCLUDED.state_after";
        self.exec(
            SQL,
            &[
                &id,
                &product_id,
                &user_id,
                &quantity,
                &start_date,
                &end_date,
                &total_price.amount,
                &total_price.currency,
                &status,
                &state_before,
                &state_after,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Contract, contract::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Contract, contract::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: contract::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM contracts \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
