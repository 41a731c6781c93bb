//! Values that sqlx can bind, with the matching PostgreSQL parameter type.

use rust_decimal::Decimal;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// A value bound to a PostgreSQL query parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum BindValue {
    Int(i32),
    Text(String),
    Decimal(Decimal),
}

impl From<i32> for BindValue {
    fn from(v: i32) -> Self {
        BindValue::Int(v)
    }
}

impl From<&str> for BindValue {
    fn from(v: &str) -> Self {
        BindValue::Text(v.to_string())
    }
}

impl From<Decimal> for BindValue {
    fn from(v: Decimal) -> Self {
        BindValue::Decimal(v)
    }
}

impl<'q> Encode<'q, Postgres> for BindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            BindValue::Int(n) => <i32 as Encode<Postgres>>::encode_by_ref(n, buf),
            BindValue::Text(s) => <&str as Encode<Postgres>>::encode_by_ref(&s.as_str(), buf),
            BindValue::Decimal(d) => <Decimal as Encode<Postgres>>::encode_by_ref(d, buf),
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        match self {
            BindValue::Int(_) => Some(<i32 as Type<Postgres>>::type_info()),
            BindValue::Text(_) => Some(<String as Type<Postgres>>::type_info()),
            BindValue::Decimal(_) => Some(<Decimal as Type<Postgres>>::type_info()),
        }
    }
}

impl Type<Postgres> for BindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}
