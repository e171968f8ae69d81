//! Header alias table for coal-quality properties

use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

use crate::types::Oxide;

/// Canonical coal-quality properties.
///
/// Only the oxides and GCV feed the optimizer; proximate-analysis fields are
/// recognized so that full lab sheets normalize without noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CoalProperty {
    Oxide(Oxide),
    Gcv,
    Ash,
    Moisture,
    VolatileMatter,
    FixedCarbon,
    Sulfur,
    Hgi,
}

impl CoalProperty {
    /// Canonical key used in JSON output.
    pub const fn key(self) -> &'static str {
        match self {
            CoalProperty::Oxide(oxide) => oxide.label(),
            CoalProperty::Gcv => "GCV",
            CoalProperty::Ash => "Ash",
            CoalProperty::Moisture => "Moisture",
            CoalProperty::VolatileMatter => "VolatileMatter",
            CoalProperty::FixedCarbon => "FixedCarbon",
            CoalProperty::Sulfur => "Sulfur",
            CoalProperty::Hgi => "HGI",
        }
    }
}

impl std::fmt::Display for CoalProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Bracketed unit annotations: `(%)`, `[kcal/kg]`, `(wt %, db)`.
fn unit_annotation() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"[\(\[][^\)\]]*[\)\]]").ok())
        .as_ref()
}

/// Map Unicode sub/superscript digits to ASCII.
fn ascii_digit(c: char) -> char {
    match c {
        '₀' | '⁰' => '0',
        '₁' | '¹' => '1',
        '₂' | '²' => '2',
        '₃' | '³' => '3',
        '₄' | '⁴' => '4',
        '₅' | '⁵' => '5',
        '₆' | '⁶' => '6',
        '₇' | '⁷' => '7',
        '₈' | '⁸' => '8',
        '₉' | '⁹' => '9',
        other => other,
    }
}

/// Reduce a header to its comparison form.
///
/// Drops bracketed units, maps sub/superscript digits to ASCII, keeps only
/// ASCII alphanumerics and lowercases. Trailing unit words (`wt`, `pct`,
/// `percent`) are removed when something remains after them.
///
/// `"SiO₂ (wt %)"` → `"sio2"`, `"Gross Calorific Value"` → `"grosscalorificvalue"`.
pub fn fold_header(raw: &str) -> String {
    let without_units = match unit_annotation() {
        Some(re) => re.replace_all(raw, ""),
        None => raw.into(),
    };

    let folded: String = without_units
        .chars()
        .map(ascii_digit)
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    for suffix in ["percent", "pct", "wt"] {
        if let Some(stem) = folded.strip_suffix(suffix) {
            if !stem.is_empty() {
                return stem.to_string();
            }
        }
    }
    folded
}

/// Resolve a raw header to its canonical property, if known.
pub fn canonical_key(raw: &str) -> Option<CoalProperty> {
    let property = match fold_header(raw).as_str() {
        "sio2" | "silica" | "silicondioxide" => CoalProperty::Oxide(Oxide::SiO2),
        "al2o3" | "alumina" | "aluminiumoxide" | "aluminumoxide" => CoalProperty::Oxide(Oxide::Al2O3),
        "fe2o3" | "ironoxide" | "ferricoxide" => CoalProperty::Oxide(Oxide::Fe2O3),
        "cao" | "lime" | "calciumoxide" => CoalProperty::Oxide(Oxide::CaO),
        "mgo" | "magnesia" | "magnesiumoxide" => CoalProperty::Oxide(Oxide::MgO),
        "na2o" | "soda" | "sodiumoxide" => CoalProperty::Oxide(Oxide::Na2O),
        "k2o" | "potash" | "potassiumoxide" => CoalProperty::Oxide(Oxide::K2O),
        "so3" | "sulfurtrioxide" | "sulphurtrioxide" => CoalProperty::Oxide(Oxide::SO3),
        "tio2" | "titania" | "titaniumdioxide" => CoalProperty::Oxide(Oxide::TiO2),
        "gcv" | "cv" | "hhv" | "grosscalorificvalue" | "calorificvalue" | "heatvalue"
        | "grossheatvalue" | "heatingvalue" => CoalProperty::Gcv,
        "ash" | "ashcontent" => CoalProperty::Ash,
        "moisture" | "tm" | "totalmoisture" => CoalProperty::Moisture,
        "vm" | "volatilematter" | "volatiles" => CoalProperty::VolatileMatter,
        "fc" | "fixedcarbon" => CoalProperty::FixedCarbon,
        "s" | "ts" | "sulfur" | "sulphur" | "totalsulfur" | "totalsulphur" => CoalProperty::Sulfur,
        "hgi" | "hardgrove" | "hardgroveindex" | "hardgrovegrindabilityindex" => CoalProperty::Hgi,
        _ => return None,
    };
    Some(property)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_subscripts_units_and_case() {
        assert_eq!(fold_header("SiO₂"), "sio2");
        assert_eq!(fold_header("Al₂O₃ (%)"), "al2o3");
        assert_eq!(fold_header(" fe2o3 [wt %] "), "fe2o3");
        assert_eq!(fold_header("Na2O wt%"), "na2o");
        assert_eq!(fold_header("Gross Calorific Value (kcal/kg)"), "grosscalorificvalue");
    }

    #[test]
    fn every_oxide_label_resolves_to_itself() {
        for oxide in Oxide::ALL {
            assert_eq!(canonical_key(oxide.label()), Some(CoalProperty::Oxide(oxide)));
        }
    }

    #[test]
    fn resolves_common_aliases() {
        assert_eq!(canonical_key("Silica"), Some(CoalProperty::Oxide(Oxide::SiO2)));
        assert_eq!(canonical_key("K₂O"), Some(CoalProperty::Oxide(Oxide::K2O)));
        assert_eq!(canonical_key("TIO2"), Some(CoalProperty::Oxide(Oxide::TiO2)));
        assert_eq!(canonical_key("GCV"), Some(CoalProperty::Gcv));
        assert_eq!(canonical_key("Heat Value"), Some(CoalProperty::Gcv));
        assert_eq!(canonical_key("Total Moisture (%)"), Some(CoalProperty::Moisture));
        assert_eq!(canonical_key("HGI"), Some(CoalProperty::Hgi));
    }

    #[test]
    fn unknown_headers_do_not_resolve() {
        assert_eq!(canonical_key("Supplier"), None);
        assert_eq!(canonical_key(""), None);
        assert_eq!(canonical_key("(%)"), None);
    }

    #[test]
    fn sulfur_trioxide_is_not_sulfur() {
        assert_eq!(canonical_key("SO₃"), Some(CoalProperty::Oxide(Oxide::SO3)));
        assert_eq!(canonical_key("Sulphur"), Some(CoalProperty::Sulfur));
    }
}
