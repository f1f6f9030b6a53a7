use pgzod_core::Dialect;

/// How refinements, wrappers and transforms are composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composition {
    /// `z.string().max(10).nullable()`
    Chained,
    /// `z.nullable(z.string().check(z.maxLength(10)))`
    Functional,
}

/// A single refinement or overwrite applied to a scalar expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Trim,
    Lowercase,
    Uppercase,
    Normalize,
    MaxLength(i32),
    NonNegative,
}

impl Check {
    fn chained(&self) -> String {
        match self {
            Check::Trim => ".trim()".to_string(),
            Check::Lowercase => ".toLowerCase()".to_string(),
            Check::Uppercase => ".toUpperCase()".to_string(),
            Check::Normalize => ".normalize()".to_string(),
            Check::MaxLength(max) => format!(".max({max})"),
            Check::NonNegative => ".nonnegative()".to_string(),
        }
    }

    fn functional(&self) -> String {
        match self {
            Check::Trim => "z.trim()".to_string(),
            Check::Lowercase => "z.toLowerCase()".to_string(),
            Check::Uppercase => "z.toUpperCase()".to_string(),
            Check::Normalize => "z.normalize()".to_string(),
            Check::MaxLength(max) => format!("z.maxLength({max})"),
            Check::NonNegative => "z.nonnegative()".to_string(),
        }
    }
}

/// The literal spellings that differ between validation library versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectProfile {
    pub import_line: &'static str,
    pub email: &'static str,
    pub url: &'static str,
    pub uuid: &'static str,
    pub integer: &'static str,
    pub json: &'static str,
    pub composition: Composition,
}

const CLASSIC: DialectProfile = DialectProfile {
    import_line: "import { z } from 'zod';",
    email: "z.string().email()",
    url: "z.string().url()",
    uuid: "z.string().uuid()",
    integer: "z.number().int()",
    json: "z.any()",
    composition: Composition::Chained,
};

const ZOD4: DialectProfile = DialectProfile {
    import_line: "import { z } from 'zod';",
    email: "z.email()",
    url: "z.url()",
    uuid: "z.uuid()",
    integer: "z.int()",
    json: "z.json()",
    composition: Composition::Chained,
};

const ZOD4_MINI: DialectProfile = DialectProfile {
    import_line: "import { z } from 'zod/mini';",
    composition: Composition::Functional,
    ..ZOD4
};

impl DialectProfile {
    pub fn for_dialect(dialect: Dialect) -> &'static DialectProfile {
        match dialect {
            Dialect::Default | Dialect::Zod3 => &CLASSIC,
            Dialect::Zod4 => &ZOD4,
            Dialect::Zod4Mini => &ZOD4_MINI,
        }
    }

    pub fn checks(&self, expr: String, checks: &[Check]) -> String {
        if checks.is_empty() {
            return expr;
        }
        match self.composition {
            Composition::Chained => {
                let chain: String = checks.iter().map(Check::chained).collect();
                format!("{expr}{chain}")
            }
            Composition::Functional => {
                let args: Vec<String> = checks.iter().map(Check::functional).collect();
                format!("{expr}.check({})", args.join(", "))
            }
        }
    }

    pub fn nullable(&self, expr: String) -> String {
        match self.composition {
            Composition::Chained => format!("{expr}.nullable()"),
            Composition::Functional => format!("z.nullable({expr})"),
        }
    }

    pub fn optional(&self, expr: String) -> String {
        match self.composition {
            Composition::Chained => format!("{expr}.optional()"),
            Composition::Functional => format!("z.optional({expr})"),
        }
    }

    pub fn transform(&self, expr: String, function: &str) -> String {
        match self.composition {
            Composition::Chained => format!("{expr}.transform({function})"),
            Composition::Functional => format!("z.pipe({expr}, z.transform({function}))"),
        }
    }

    /// Every field of `schema` made optional, used for update payloads.
    pub fn partial(&self, schema: &str) -> String {
        match self.composition {
            Composition::Chained => format!("{schema}.partial()"),
            Composition::Functional => format!("z.partial({schema})"),
        }
    }
}
