/// How sqlite treats values stored in a column, derived from its declared type.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Affinity {
    Integer,
    Text,
    Blob,
    Real,
    Numeric,
}

impl Affinity {
    /// sqlite's rules, applied in order, to a declared type such as `VARCHAR(20)` or `UNSIGNED BIG INT`.
    pub fn from_declared_type(declared: &str) -> Affinity {
        let upper = declared.to_ascii_uppercase();
        let has = |s: &str| upper.contains(s);

        if has("INT") {
            Affinity::Integer
        } else if has("CHAR") || has("CLOB") || has("TEXT") {
            Affinity::Text
        } else if has("BLOB") || upper.trim().is_empty() {
            Affinity::Blob
        } else if has("REAL") || has("FLOA") || has("DOUB") {
            Affinity::Real
        } else {
            Affinity::Numeric
        }
    }
}

/// One row of `pragma_table_info`.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Column {
    pub index: i64,
    pub name: String,
    pub declared_type: String,
    pub not_null: bool,
    pub default_value: Option<String>,
    /// 1-based position in the primary key, or 0.
    pub primary_key: u32,
}

/// Type used for columns which may hold anything.
const ANY_TYPE: &str = "lite_datastore::Value";

impl Column {
    pub fn is_not_null(&self) -> bool {
        self.not_null
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key > 0
    }

    pub fn affinity(&self) -> Affinity {
        Affinity::from_declared_type(&self.declared_type)
    }

    /// The Rust type of a non-null value of this column.
    pub fn rust_type(&self) -> &'static str {
        // An untyped column has blob affinity but takes values of any type.
        if self.declared_type.trim().is_empty() {
            return ANY_TYPE;
        }

        match self.affinity() {
            Affinity::Integer => "i64",
            Affinity::Text => "String",
            Affinity::Blob => "Vec<u8>",
            Affinity::Real => "f64",
            Affinity::Numeric => ANY_TYPE,
        }
    }

    /// The type of the generated field.
    ///
    /// Nullable columns become `Option`, except primary keys and columns already using the catch-all value type,
    /// which has its own null.
    pub fn field_type(&self) -> String {
        let ty = self.rust_type();
        if self.is_not_null() || self.is_primary_key() || ty == ANY_TYPE {
            ty.to_string()
        } else {
            format!("Option<{}>", ty)
        }
    }
}
