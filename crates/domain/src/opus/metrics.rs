//! Derived counts and yield percentages for an OPU row.
//!
//! Percentages are always relative to the cultivated count (`ctv`). The
//! divisor floors at 1, so a row with `ctv = 0` reports the raw numerator
//! times 100 (e.g. 5 cleaved with no cultivated oocytes gives `500%`).

/// `gi + gii + giii`, saturating at the `i64` bounds.
pub fn viables(gi: i64, gii: i64, giii: i64) -> i64 {
    gi.saturating_add(gii).saturating_add(giii)
}

/// `viables + otros`, saturating at the `i64` bounds.
pub fn total_oocitos(viables: i64, otros: i64) -> i64 {
    viables.saturating_add(otros)
}

/// `round(numerator / max(ctv, 1) * 100)`
pub fn percentage(numerator: i64, ctv: i64) -> i64 {
    let divisor = ctv.max(1) as f64;
    let ratio = numerator as f64 / divisor * 100.0;
    ratio.round() as i64
}

pub fn format_percentage(numerator: i64, ctv: i64) -> String {
    format!("{}%", percentage(numerator, ctv))
}

/// The full set of percentages persisted with a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YieldPercentages {
    pub porcentaje_cliv: String,
    pub porcentaje_prevision: String,
    pub porcentaje_empaque: String,
    pub porcentaje_vtdt: String,
    pub total_embriones: i64,
    pub porcentaje_total_embriones: String,
}

impl YieldPercentages {
    pub fn compute(ctv: i64, clivados: i64, prevision: i64, empaque: i64, vt_dt: i64) -> Self {
        Self {
            porcentaje_cliv: format_percentage(clivados, ctv),
            porcentaje_prevision: format_percentage(prevision, ctv),
            porcentaje_empaque: format_percentage(empaque, ctv),
            porcentaje_vtdt: format_percentage(vt_dt, ctv),
            total_embriones: prevision,
            porcentaje_total_embriones: format_percentage(prevision, ctv),
        }
    }
}
