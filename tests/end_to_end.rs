// End-to-end: directory of price files -> catalog -> sorted listing -> export

use price_catalog::{export, render_sorted, Catalog, ExportFormat};
use std::fs;
use tempfile::TempDir;

fn price_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (name, content) in files {
        fs::write(dir.path().join(name), content).unwrap();
    }
    dir
}

#[test]
fn test_single_file_round_trip() {
    let dir = price_dir(&[("price.csv", "товар,цена,вес\nЯблоко,100,2\n")]);

    let mut catalog = Catalog::new();
    catalog.ingest(dir.path()).unwrap();

    assert_eq!(catalog.len(), 1);
    let record = &catalog.all()[0];
    assert_eq!(record.name(), "Яблоко");
    assert_eq!(record.price(), 100.0);
    assert_eq!(record.weight(), 2.0);
    assert_eq!(record.price_per_unit(), 50.0);
}

#[test]
fn test_two_files_sorted_by_price_per_kg() {
    let dir = price_dir(&[
        ("price1.csv", "продукт,розница,масса\nХлеб,40,0.5\n"),
        ("price2.csv", "наименование,цена,фасовка\nМолоко,60,1\n"),
    ]);

    let mut catalog = Catalog::new();
    catalog.ingest(dir.path()).unwrap();

    let sorted = render_sorted(catalog.all());
    let listing: Vec<(&str, f64)> = sorted
        .iter()
        .map(|r| (r.name(), r.price_per_unit()))
        .collect();
    assert_eq!(listing, vec![("Молоко", 60.0), ("Хлеб", 80.0)]);
}

#[test]
fn test_file_without_price_in_name_is_never_ingested() {
    let dir = price_dir(&[
        ("data.csv", "товар,цена,вес\nЯблоко,100,2\n"),
        ("price.csv", "товар,цена,вес\nГруша,90,1\n"),
    ]);

    let mut catalog = Catalog::new();
    catalog.ingest(dir.path()).unwrap();

    assert!(catalog.search("яблоко").is_empty());
    assert_eq!(catalog.len(), 1);
}

#[test]
fn test_mixed_headers_with_extra_columns_and_export() {
    let dir = price_dir(&[
        (
            "price_0.csv",
            "№,наименование,фасовка,розница,поставщик\n1,Сыр Гауда,0.25,210,ООО Ромашка\n2,Масло,0.2,180,ООО Ромашка\n",
        ),
        (
            "price_1.csv",
            "название,цена,вес,остаток\nКартофель,60,2,100\nСоль,20,0,5\n",
        ),
        ("price_2.csv", "товар,стоимость,вес\nЛук,30,1\n"),
    ]);

    let mut catalog = Catalog::new();
    let report = catalog.ingest(dir.path()).unwrap();

    assert_eq!(report.records_added(), 4);
    assert_eq!(report.unresolved_files().len(), 1);

    let names: Vec<&str> = render_sorted(catalog.all()).into_iter().map(|r| r.name()).collect();
    assert_eq!(names, vec!["Соль", "Картофель", "Сыр Гауда", "Масло"]);

    let out = dir.path().join("output.html");
    export(catalog.all(), &out, ExportFormat::Html).unwrap();
    let html = fs::read_to_string(&out).unwrap();
    assert!(html.contains("<td>840.00</td>"));
    assert!(html.contains("<td>900.00</td>"));
    assert!(html.contains("<td>price_0.csv</td>"));
}
