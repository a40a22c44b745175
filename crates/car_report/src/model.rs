//! The vehicle record rendered into the report and its display projections.
//!
//! The record is a plain immutable value: it is created once with the sample
//! defaults (or assembled through the consuming `with_*` builders) and only
//! read afterwards.  All user-visible formatting lives here so the report
//! builder and any frontend agree on the exact strings.

/// A single vehicle's specification sheet.
///
/// No field is validated; the constructor guarantees fully populated default
/// values and the report renders whatever it is given.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleRecord {
    vin: String,
    make: String,
    model: String,
    year: u16,
    color: String,
    engine_size_l: f64,
    horsepower: u32,
    price: f64,
}

impl Default for VehicleRecord {
    fn default() -> Self {
        Self {
            vin: "XYZ1234567890ABC".to_owned(),
            make: "Ford".to_owned(),
            model: "Mustang GT".to_owned(),
            year: 2024,
            color: "Race Red".to_owned(),
            engine_size_l: 5.0,
            horsepower: 486,
            price: 55995.00,
        }
    }
}

impl VehicleRecord {
    /// Creates the built-in sample record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the vehicle identification number.
    pub fn vin(&self) -> &str {
        &self.vin
    }

    /// Returns the manufacturer name.
    pub fn make(&self) -> &str {
        &self.make
    }

    /// Returns the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the model year.
    pub fn year(&self) -> u16 {
        self.year
    }

    /// Returns the exterior color.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Returns the engine displacement in liters.
    pub fn engine_size_l(&self) -> f64 {
        self.engine_size_l
    }

    /// Returns the maximum horsepower.
    pub fn horsepower(&self) -> u32 {
        self.horsepower
    }

    /// Returns the suggested retail price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Sets the VIN and returns the updated record.
    pub fn with_vin(mut self, vin: impl Into<String>) -> Self {
        self.vin = vin.into();
        self
    }

    /// Sets the manufacturer and returns the updated record.
    pub fn with_make(mut self, make: impl Into<String>) -> Self {
        self.make = make.into();
        self
    }

    /// Sets the model name and returns the updated record.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the model year and returns the updated record.
    pub fn with_year(mut self, year: u16) -> Self {
        self.year = year;
        self
    }

    /// Sets the exterior color and returns the updated record.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Sets the engine displacement in liters and returns the updated record.
    pub fn with_engine_size_l(mut self, engine_size_l: f64) -> Self {
        self.engine_size_l = engine_size_l;
        self
    }

    /// Sets the horsepower and returns the updated record.
    pub fn with_horsepower(mut self, horsepower: u32) -> Self {
        self.horsepower = horsepower;
        self
    }

    /// Sets the price and returns the updated record.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Produces the seven labeled table rows of the report, in render order.
    pub fn summary_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Manufacturer", self.make.clone()),
            ("Model Name", self.model.clone()),
            ("Model Year", self.year.to_string()),
            ("Exterior Color", self.color.clone()),
            (
                "Engine Displacement",
                format!("{:.1} Liters", self.engine_size_l),
            ),
            ("Max Horsepower", format!("{} HP", self.horsepower)),
            ("Suggested Retail Price (MSRP)", format_currency(self.price)),
        ]
    }
}

/// One-way projection of a [`VehicleRecord`] into pre-formatted display
/// strings, independent of any widget toolkit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayFields {
    /// Vehicle identification number, verbatim.
    pub vin: String,
    /// Manufacturer name, verbatim.
    pub make: String,
    /// Model name, verbatim.
    pub model: String,
    /// Model year as a plain integer string.
    pub year: String,
    /// Exterior color, verbatim.
    pub color: String,
    /// Engine displacement with the short unit suffix, e.g. "5.0 L".
    pub engine: String,
    /// Horsepower with unit suffix, e.g. "486 HP".
    pub horsepower: String,
    /// Currency-formatted price, e.g. "$55,995.00".
    pub price: String,
}

impl From<&VehicleRecord> for DisplayFields {
    fn from(record: &VehicleRecord) -> Self {
        Self {
            vin: record.vin.clone(),
            make: record.make.clone(),
            model: record.model.clone(),
            year: record.year.to_string(),
            color: record.color.clone(),
            engine: format!("{:.1} L", record.engine_size_l),
            horsepower: format!("{} HP", record.horsepower),
            price: format_currency(record.price),
        }
    }
}

/// Formats a currency amount as `$1,234.56`.
///
/// The format is fixed to en-US conventions so the rendered report does not
/// depend on the host locale.  Amounts are rounded to whole cents first.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, group_thousands(whole), fraction)
}

fn group_thousands(mut value: u64) -> String {
    let mut groups = Vec::new();
    loop {
        let group = value % 1000;
        value /= 1000;
        if value == 0 {
            groups.push(group.to_string());
            break;
        }
        groups.push(format!("{:03}", group));
    }
    groups.reverse();
    groups.join(",")
}

#[cfg(test)]
mod tests {
    use super::{format_currency, DisplayFields, VehicleRecord};

    #[test]
    fn default_record_is_fully_populated() {
        let record = VehicleRecord::default();
        assert_eq!(record.vin(), "XYZ1234567890ABC");
        assert_eq!(record.make(), "Ford");
        assert_eq!(record.model(), "Mustang GT");
        assert_eq!(record.year(), 2024);
        assert_eq!(record.color(), "Race Red");
        assert_eq!(record.engine_size_l(), 5.0);
        assert_eq!(record.horsepower(), 486);
        assert_eq!(record.price(), 55995.00);
    }

    #[test]
    fn summary_rows_match_expected_values() {
        let rows = VehicleRecord::default().summary_rows();
        let values: Vec<&str> = rows.iter().map(|(_, value)| value.as_str()).collect();
        assert_eq!(
            values,
            [
                "Ford",
                "Mustang GT",
                "2024",
                "Race Red",
                "5.0 Liters",
                "486 HP",
                "$55,995.00",
            ]
        );
    }

    #[test]
    fn summary_rows_keep_label_order() {
        let labels: Vec<&str> = VehicleRecord::default()
            .summary_rows()
            .into_iter()
            .map(|(label, _)| label)
            .collect();
        assert_eq!(
            labels,
            [
                "Manufacturer",
                "Model Name",
                "Model Year",
                "Exterior Color",
                "Engine Displacement",
                "Max Horsepower",
                "Suggested Retail Price (MSRP)",
            ]
        );
    }

    #[test]
    fn summary_rows_handle_boundary_values() {
        let record = VehicleRecord::default()
            .with_year(1900)
            .with_horsepower(0)
            .with_price(0.0);
        let rows = record.summary_rows();
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[2].1, "1900");
        assert_eq!(rows[5].1, "0 HP");
        assert_eq!(rows[6].1, "$0.00");
    }

    #[test]
    fn records_can_be_assembled_field_by_field() {
        let record = VehicleRecord::new()
            .with_vin("1FTFW1E50PFA00001")
            .with_make("Toyota")
            .with_model("Corolla")
            .with_year(1998)
            .with_color("Silver")
            .with_engine_size_l(1.8)
            .with_horsepower(120)
            .with_price(18500.0);

        assert_eq!(record.vin(), "1FTFW1E50PFA00001");
        let rows = record.summary_rows();
        assert_eq!(rows[0].1, "Toyota");
        assert_eq!(rows[1].1, "Corolla");
        assert_eq!(rows[3].1, "Silver");
        assert_eq!(rows[4].1, "1.8 Liters");
        assert_eq!(rows[6].1, "$18,500.00");
    }

    #[test]
    fn display_fields_project_formatted_values() {
        let fields = DisplayFields::from(&VehicleRecord::default());
        assert_eq!(fields.engine, "5.0 L");
        assert_eq!(fields.horsepower, "486 HP");
        assert_eq!(fields.price, "$55,995.00");
        assert_eq!(fields.year, "2024");
    }

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(55995.00), "$55,995.00");
        assert_eq!(format_currency(1234567.5), "$1,234,567.50");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-42.5), "-$42.50");
    }
}
