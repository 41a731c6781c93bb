//! Static table mapping: table names, column bindings, foreign keys and navigable relations.

mod tables;
mod validator;

pub use tables::{PRICE_SCALE, CLIENTS, CLIENT_SALES, ENTITY_MAPPINGS, PRODUCTS, SALES, SALES_CLIENT, SALES_PRODUCT};
pub use validator::validate;

/// Storage type of a mapped column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnType {
    /// Integer primary key generated by the database.
    Identity,
    Integer,
    Text,
    Numeric { precision: u8, scale: u8 },
}

impl ColumnType {
    /// PostgreSQL type used in DDL.
    pub fn ddl(&self) -> String {
        match self {
            ColumnType::Identity => "INTEGER GENERATED BY DEFAULT AS IDENTITY".into(),
            ColumnType::Integer => "INTEGER".into(),
            ColumnType::Text => "TEXT".into(),
            ColumnType::Numeric { precision, scale } => format!("NUMERIC({}, {})", precision, scale),
        }
    }

    /// PostgreSQL type name for parameter casts.
    pub fn pg_type(&self) -> &'static str {
        match self {
            ColumnType::Identity | ColumnType::Integer => "integer",
            ColumnType::Text => "text",
            ColumnType::Numeric { .. } => "numeric",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnDelete {
    NoAction,
    Cascade,
}

impl OnDelete {
    pub fn sql(&self) -> &'static str {
        match self {
            OnDelete::NoAction => "NO ACTION",
            OnDelete::Cascade => "CASCADE",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ForeignKey {
    pub table: &'static str,
    pub column: &'static str,
    pub on_delete: OnDelete,
}

#[derive(Clone, Copy, Debug)]
pub struct ColumnMapping {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub references: Option<ForeignKey>,
}

/// Direction of a relation: to_one (we hold the FK) or to_many (they hold the FK to us).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IncludeDirection {
    ToOne,
    ToMany,
}

/// A navigable relation that can be fetched in the same statement as its owner.
#[derive(Clone, Copy, Debug)]
pub struct RelationMapping {
    /// Relation name; also the result column alias of the include.
    pub name: &'static str,
    pub direction: IncludeDirection,
    pub related: fn() -> &'static EntityMapping,
    /// Our column used in the join (our FK for to_one; our id for to_many).
    pub our_key: &'static str,
    /// Their column used in the join (their id for to_one; their FK for to_many).
    pub their_key: &'static str,
}

#[derive(Debug)]
pub struct EntityMapping {
    pub name: &'static str,
    pub table: &'static str,
    pub id_column: &'static str,
    pub columns: &'static [ColumnMapping],
    pub relations: &'static [&'static RelationMapping],
}

impl EntityMapping {
    pub fn column(&self, name: &str) -> Option<&ColumnMapping> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns written on insert/update, in mapping order (identity excluded).
    pub fn data_columns(&self) -> impl Iterator<Item = &ColumnMapping> {
        self.columns.iter().filter(|c| c.column_type != ColumnType::Identity)
    }
}

/// Enumerated relation of an entity, resolved to its static mapping.
pub trait Relation: Copy + std::fmt::Debug + Send + Sync + 'static {
    fn mapping(self) -> &'static RelationMapping;
}

/// Relation type of entities without navigable relations.
#[derive(Clone, Copy, Debug)]
pub enum NoRelation {}

impl Relation for NoRelation {
    fn mapping(self) -> &'static RelationMapping {
        match self {}
    }
}
