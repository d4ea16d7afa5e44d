use std::fmt;
use std::str::FromStr;

use crate::DomainError;

/// Operator-editable columns of an OPU row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpusField {
    DonanteCode,
    Race,
    ToroId,
    Gi,
    Gii,
    Giii,
    Otros,
    Ctv,
    Clivados,
    Prevision,
    Empaque,
    VtDt,
    Order,
}

impl OpusField {
    pub const ALL: [OpusField; 13] = [
        Self::DonanteCode,
        Self::Race,
        Self::ToroId,
        Self::Gi,
        Self::Gii,
        Self::Giii,
        Self::Otros,
        Self::Ctv,
        Self::Clivados,
        Self::Prevision,
        Self::Empaque,
        Self::VtDt,
        Self::Order,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DonanteCode => "donante_code",
            Self::Race => "race",
            Self::ToroId => "toro_id",
            Self::Gi => "gi",
            Self::Gii => "gii",
            Self::Giii => "giii",
            Self::Otros => "otros",
            Self::Ctv => "ctv",
            Self::Clivados => "clivados",
            Self::Prevision => "prevision",
            Self::Empaque => "empaque",
            Self::VtDt => "vt_dt",
            Self::Order => "order",
        }
    }

    /// Oocyte grades feeding `viables` and `total_oocitos`.
    pub fn is_oocyte_count(&self) -> bool {
        matches!(self, Self::Gi | Self::Gii | Self::Giii | Self::Otros)
    }

    /// Fields whose raw input is coerced to an integer.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::DonanteCode | Self::Race)
    }
}

impl fmt::Display for OpusField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpusField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("Campo desconocido: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip() {
        for field in OpusField::ALL {
            assert_eq!(field.as_str().parse::<OpusField>().unwrap(), field);
        }
    }

    #[test]
    fn test_unknown_field() {
        let err = "porcentaje_cliv".parse::<OpusField>().unwrap_err();
        assert_eq!(err.to_string(), "Campo desconocido: porcentaje_cliv");
    }

    #[test]
    fn test_field_classes() {
        assert!(OpusField::Otros.is_oocyte_count());
        assert!(!OpusField::Ctv.is_oocyte_count());
        assert!(OpusField::ToroId.is_numeric());
        assert!(!OpusField::Race.is_numeric());
    }
}
