//! Catalog fixtures shared by the unit tests

use mouserec_core::NormalizedCatalog;

pub(crate) const HEADER: &str = "Name,Brand,Connection,Power,Battery Life,Buttons Type,Size,Shape,Category,Price,Weight,DPI,Polling Rate,Buttons,Image,Link";

#[allow(clippy::too_many_arguments)]
pub(crate) fn row(
    name: &str,
    brand: &str,
    connection: &str,
    size: &str,
    shape: &str,
    category: &str,
    price: f64,
    weight: f64,
    dpi: f64,
    buttons: f64,
) -> String {
    let (power, battery) = if connection == "Wired" { ("", "") } else { ("Battery", "70 hours") };
    format!(
        "{name},{brand},{connection},{power},{battery},Mechanical,{size},{shape},{category},{price},{weight},{dpi},1000,{buttons},{},",
        name.to_lowercase().replace(' ', "_")
    )
}

pub(crate) fn catalog_from_rows(rows: &[String]) -> NormalizedCatalog {
    let csv = format!("{HEADER}\n{}\n", rows.join("\n"));
    NormalizedCatalog::from_reader(csv.as_bytes(), "target/no-such-image-dir").unwrap()
}

/// Six mice across two brands, three sizes and two categories
pub(crate) fn sample_catalog() -> NormalizedCatalog {
    catalog_from_rows(&[
        row("G Pro X Superlight", "Logitech", "Wireless", "Medium", "Symmetrical", "Gaming", 2_000_000.0, 63.0, 25600.0, 5.0),
        row("G502 Hero", "Logitech", "Wired", "Large", "Ergonomic", "Gaming", 800_000.0, 121.0, 25600.0, 11.0),
        row("Viper Mini", "Razer", "Wired", "Small", "Symmetrical", "Gaming", 400_000.0, 61.0, 8500.0, 6.0),
        row("DeathAdder V2", "Razer", "Wired", "Large", "Ergonomic", "Gaming", 900_000.0, 82.0, 20000.0, 8.0),
        row("MX Master 3", "Logitech", "Wireless", "Large", "Ergonomic", "Office", 1_500_000.0, 141.0, 4000.0, 7.0),
        row("Pebble M350", "Logitech", "Wireless", "Small", "Ambidextrous", "Office", 250_000.0, 100.0, 1000.0, 3.0),
    ])
}
