use sqlx::PgConnection;
use sqlx::types::Json;

use pgzod_core::{Error, RawColumnDescriptor, RelationKind, Result};

/// One row of the catalog query: a single (relation, column) pair.
#[derive(Debug, sqlx::FromRow)]
pub struct CatalogRow {
    pub schema_name: String,
    pub table_name: String,
    pub relkind: String,
    pub column_name: String,
    pub ordinal_position: i16,
    pub udt_name: String,
    pub is_nullable: bool,
    pub column_default: Option<String>,
    pub max_length: Option<i32>,
    pub description: Option<String>,
    pub check_constraints: Json<Vec<String>>,
    pub enum_labels: Json<Vec<String>>,
}

impl CatalogRow {
    pub fn into_raw(self) -> RawColumnDescriptor {
        RawColumnDescriptor {
            name: self.column_name,
            table_name: self.table_name,
            table_kind: RelationKind::from_relkind(&self.relkind),
            schema_name: self.schema_name,
            data_type: self.udt_name,
            is_nullable: self.is_nullable,
            default: self.column_default,
            max_length: self.max_length,
            description: self.description,
            check_constraints: self.check_constraints.0,
            enum_labels: self.enum_labels.0,
            ordinal_position: self.ordinal_position,
        }
    }
}

const CATALOG_QUERY: &str = r#"
select
  n.nspname as schema_name,
  c.relname as table_name,
  c.relkind::text as relkind,
  a.attname as column_name,
  a.attnum as ordinal_position,
  t.typname as udt_name,
  (not a.attnotnull) as is_nullable,
  pg_get_expr(ad.adbin, ad.adrelid) as column_default,
  case
    when t.typname in ('varchar', 'bpchar', '_varchar', '_bpchar') and a.atttypmod > 4
      then a.atttypmod - 4
    else null
  end as max_length,
  pg_catalog.col_description(a.attrelid, a.attnum) as description,
  coalesce((
    select json_agg(pg_get_expr(con.conbin, con.conrelid) order by con.conname)
    from pg_constraint con
    where con.conrelid = c.oid
      and con.contype = 'c'
      and a.attnum = any(con.conkey)
  ), '[]'::json) as check_constraints,
  coalesce((
    select json_agg(e.enumlabel order by e.enumsortorder)
    from pg_enum e
    where e.enumtypid = coalesce(nullif(t.typelem, 0), t.oid)
  ), '[]'::json) as enum_labels
from pg_attribute a
join pg_class c on c.oid = a.attrelid
join pg_namespace n on n.oid = c.relnamespace
join pg_type t on t.oid = a.atttypid
left join pg_attrdef ad on ad.adrelid = a.attrelid and ad.adnum = a.attnum
where n.nspname = $1
  and c.relkind in ('r', 'p', 'v', 'm', 'f')
  and a.attnum > 0
  and not a.attisdropped
order by c.relname, a.attnum
"#;

/// Fetch every column of every relation in `schema` with one round trip.
pub async fn fetch_catalog_rows(conn: &mut PgConnection, schema: &str) -> Result<Vec<CatalogRow>> {
    sqlx::query_as::<_, CatalogRow>(CATALOG_QUERY)
        .bind(schema)
        .fetch_all(conn)
        .await
        .map_err(|err| Error::Catalog(err.to_string()))
}
