//! Registration card field extraction from OCR text.
//!
//! Each field is matched independently; the first hit wins and later lines
//! never overwrite it. Empty captures count as no match.

use std::sync::LazyLock;

use intake_types::RegistrationInfo;
use log::debug;
use regex::Regex;

static PLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]{3}[-\s]?[0-9]{3,4}").expect("plate pattern"));
static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(19[5-9][0-9]|20[0-2][0-9])\b").expect("year pattern"));
static VIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-HJ-NPR-Z0-9]{17}\b").expect("vin pattern"));
static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[0-9]{1,2}[/.-][0-9]{1,2}[/.-][0-9]{2,4}\b").expect("date pattern")
});

const OWNER_MARKERS: &[&str] = &["propietario", "nombre"];
const VIN_MARKERS: &[&str] = &["serie", "vin", "chasis"];
const CLASS_MARKERS: &[&str] = &["tipo", "clase"];

const COLORS: &[&str] = &[
    "blanco", "negro", "rojo", "azul", "verde", "amarillo", "gris", "plata", "dorado", "café",
    "marrón",
];

const VEHICLE_CLASSES: &[&str] = &[
    "sedan",
    "suv",
    "pickup",
    "camioneta",
    "automóvil",
    "motocicleta",
    "moto",
    "camión",
];

/// Text after the first colon, trimmed
fn after_colon(line: &str) -> Option<&str> {
    line.split(':').nth(1).map(str::trim)
}

fn longer_than(s: &str, min: usize) -> bool {
    s.chars().count() > min
}

/// Value after the colon on `lines[i]`, else the following line; both must be
/// longer than `min` characters.
fn colon_or_next(lines: &[&str], i: usize, min: usize) -> Option<String> {
    if let Some(value) = after_colon(lines[i]).filter(|v| longer_than(v, min)) {
        return Some(value.to_string());
    }
    lines
        .get(i + 1)
        .filter(|next| longer_than(next, min) && !next.trim().is_empty())
        .map(|next| next.trim().to_string())
}

/// First line whose lower-cased text contains any marker, mapped through `f`
fn find_marked<F>(lines: &[&str], markers: &[&str], mut f: F) -> Option<String>
where
    F: FnMut(usize, &str) -> Option<String>,
{
    lines.iter().enumerate().find_map(|(i, line)| {
        let lower = line.to_lowercase();
        if markers.iter().any(|m| lower.contains(m)) {
            f(i, &lower)
        } else {
            None
        }
    })
}

/// Extract registration card fields from OCR text (lines joined by '\n').
pub fn extract_registration_info(text: &str) -> RegistrationInfo {
    let lines: Vec<&str> = text.split('\n').collect();

    let owner_name = find_marked(&lines, OWNER_MARKERS, |i, _| {
        lines
            .get(i + 1)
            .filter(|next| longer_than(next, 5) && !next.trim().is_empty())
            .map(|next| next.trim().to_string())
    });

    let make = find_marked(&lines, &["marca"], |i, _| colon_or_next(&lines, i, 0));
    let model = find_marked(&lines, &["modelo"], |i, _| colon_or_next(&lines, i, 0));

    let color = find_marked(&lines, &["color"], |i, lower| {
        match after_colon(lines[i]).filter(|v| !v.is_empty()) {
            Some(value) => Some(value.to_string()),
            None => COLORS
                .iter()
                .find(|c| lower.contains(*c))
                .map(|c| c.to_string()),
        }
    });

    let vin = VIN
        .find(text)
        .map(|m| m.as_str().to_string())
        .or_else(|| find_marked(&lines, VIN_MARKERS, |i, _| colon_or_next(&lines, i, 5)));

    let engine_number = find_marked(&lines, &["motor"], |i, _| colon_or_next(&lines, i, 3));

    let vehicle_class = find_marked(&lines, CLASS_MARKERS, |i, lower| {
        VEHICLE_CLASSES
            .iter()
            .find(|c| lower.contains(*c))
            .map(|c| c.to_string())
            .or_else(|| {
                after_colon(lines[i])
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            })
    });

    let dates: Vec<&str> = DATE.find_iter(text).map(|m| m.as_str()).collect();
    let (issue_date, expiry_date) = match dates.as_slice() {
        [] => (None, None),
        [only] => (None, Some(only.to_string())),
        [first, second, ..] => (Some(first.to_string()), Some(second.to_string())),
    };

    let info = RegistrationInfo {
        plate: PLATE.find(text).map(|m| m.as_str().to_string()),
        owner_name,
        make,
        model,
        year: YEAR.find(text).map(|m| m.as_str().to_string()),
        color,
        vin,
        engine_number,
        vehicle_class,
        issue_date,
        expiry_date,
    };
    debug!("Extracted registration info: {:?}", info);
    info
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: &str = "TARJETA DE CIRCULACION\n\
PLACA: ABC-1234\n\
NOMBRE DEL PROPIETARIO\n\
JUAN PEREZ GARCIA\n\
MARCA: TOYOTA\n\
MODELO: COROLLA\n\
AÑO: 2020\n\
COLOR: BLANCO\n\
VIN: 1HGBH41JXMN109186\n\
MOTOR: 2ZR123456\n\
TIPO: SEDAN\n\
EXPEDICION 15/03/2021\n\
VENCIMIENTO 15/03/2024";

    #[test]
    fn test_full_card() {
        let info = extract_registration_info(CARD);
        assert_eq!(info.plate.as_deref(), Some("ABC-1234"));
        assert_eq!(info.owner_name.as_deref(), Some("JUAN PEREZ GARCIA"));
        assert_eq!(info.make.as_deref(), Some("TOYOTA"));
        assert_eq!(info.model.as_deref(), Some("COROLLA"));
        assert_eq!(info.year.as_deref(), Some("2020"));
        assert_eq!(info.color.as_deref(), Some("BLANCO"));
        assert_eq!(info.vin.as_deref(), Some("1HGBH41JXMN109186"));
        assert_eq!(info.engine_number.as_deref(), Some("2ZR123456"));
        assert_eq!(info.vehicle_class.as_deref(), Some("sedan"));
        assert_eq!(info.issue_date.as_deref(), Some("15/03/2021"));
        assert_eq!(info.expiry_date.as_deref(), Some("15/03/2024"));
    }

    #[test]
    fn test_plate_simple() {
        let info = extract_registration_info("Placa: ABC123");
        assert_eq!(info.plate.as_deref(), Some("ABC123"));
    }

    #[test]
    fn test_make_model_year() {
        let info = extract_registration_info("MARCA: Toyota\nMODELO: Corolla\nAÑO 2020");
        assert_eq!(info.make.as_deref(), Some("Toyota"));
        assert_eq!(info.model.as_deref(), Some("Corolla"));
        assert_eq!(info.year.as_deref(), Some("2020"));
        assert_eq!(info.plate, None);
    }

    #[test]
    fn test_make_on_next_line() {
        let info = extract_registration_info("MARCA\nNISSAN\nMARCA: FORD");
        assert_eq!(info.make.as_deref(), Some("NISSAN"));
    }

    #[test]
    fn test_single_date_is_expiry() {
        let info = extract_registration_info("VENCE 01-12-25");
        assert_eq!(info.issue_date, None);
        assert_eq!(info.expiry_date.as_deref(), Some("01-12-25"));
    }

    #[test]
    fn test_year_out_of_range() {
        let info = extract_registration_info("MODELO 1949\nCAPACIDAD 2035");
        assert_eq!(info.year, None);
    }

    #[test]
    fn test_color_keyword_without_colon() {
        let info = extract_registration_info("COLOR ROJO METALICO");
        assert_eq!(info.color.as_deref(), Some("rojo"));
    }

    #[test]
    fn test_vin_fallback_to_labelled_line() {
        let info = extract_registration_info("NO. SERIE: 3N1AB7AP5KY2");
        assert_eq!(info.vin.as_deref(), Some("3N1AB7AP5KY2"));

        let info = extract_registration_info("CHASIS\n9BWZZZ377VT00");
        assert_eq!(info.vin.as_deref(), Some("9BWZZZ377VT00"));
    }

    #[test]
    fn test_short_values_rejected() {
        let info = extract_registration_info("MOTOR: V6\nX\nNOMBRE\nANA");
        assert_eq!(info.engine_number, None);
        assert_eq!(info.owner_name, None);
    }

    #[test]
    fn test_blank_owner_line_is_no_match() {
        let info = extract_registration_info("NOMBRE\n        \nJUAN PEREZ");
        assert_eq!(info.owner_name, None);

        let info = extract_registration_info("NOMBRE\n        \nPROPIETARIO\nJUAN PEREZ");
        assert_eq!(info.owner_name.as_deref(), Some("JUAN PEREZ"));
    }

    #[test]
    fn test_vehicle_class_after_colon() {
        let info = extract_registration_info("CLASE: PARTICULAR");
        assert_eq!(info.vehicle_class.as_deref(), Some("PARTICULAR"));
    }

    #[test]
    fn test_empty_text() {
        let info = extract_registration_info("");
        assert!(info.is_empty());
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(extract_registration_info(CARD), extract_registration_info(CARD));
    }
}
