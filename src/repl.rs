// Interactive search session over a loaded catalog

use std::io::{BufRead, Write};

use crate::catalog::Catalog;
use crate::report::{format_line, render_sorted};

pub const DEFAULT_EXIT_KEYWORD: &str = "exit";

/// Session - reads queries until the exit keyword (or end of input) and
/// prints the matching positions sorted by price per kilogram
pub struct Session<'a> {
    catalog: &'a Catalog,
    exit_keyword: String,
}

impl<'a> Session<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Session {
            catalog,
            exit_keyword: DEFAULT_EXIT_KEYWORD.to_string(),
        }
    }

    pub fn with_exit_keyword(mut self, keyword: &str) -> Self {
        self.exit_keyword = keyword.to_string();
        self
    }

    fn is_exit(&self, input: &str) -> bool {
        input.to_lowercase() == self.exit_keyword.to_lowercase()
    }

    /// Print the sorted matches for one query
    pub fn answer<W: Write>(&self, query: &str, output: &mut W) -> std::io::Result<usize> {
        let results = render_sorted(self.catalog.search(query));

        if results.is_empty() {
            writeln!(output, "Не найдено ни одной позиции.")?;
        } else {
            writeln!(output, "Найдено {} позиций:", results.len())?;
            for (idx, record) in results.iter().enumerate() {
                writeln!(output, "{}", format_line(idx + 1, record))?;
            }
        }

        Ok(results.len())
    }

    /// Run the read-eval loop; returns how many queries were answered
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, output: &mut W) -> std::io::Result<usize> {
        let mut served = 0;
        let mut line = String::new();

        loop {
            write!(
                output,
                "Введите текст для поиска товара (или напишите \"{}\" для выхода): ",
                self.exit_keyword
            )?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break;
            }

            let query = line.trim_end_matches(['\r', '\n']);
            if self.is_exit(query) {
                break;
            }

            self.answer(query, output)?;
            served += 1;
        }

        writeln!(output, "Работа завершена.")?;
        Ok(served)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use std::io::Cursor;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.push(Record::new("Хлеб белый", 40.0, 0.5, "price1.csv"));
        catalog.push(Record::new("Молоко", 60.0, 1.0, "price2.csv"));
        catalog.push(Record::new("Хлеб ржаной", 30.0, 0.5, "price2.csv"));
        catalog
    }

    fn run(input: &str, session: Session<'_>) -> (usize, String) {
        let mut out = Vec::new();
        let served = session.run(Cursor::new(input), &mut out).unwrap();
        (served, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_session_prints_sorted_matches() {
        let catalog = catalog();
        let (served, out) = run("хлеб\nexit\n", Session::new(&catalog));

        assert_eq!(served, 1);
        assert!(out.contains("Найдено 2 позиций:"));
        let rye = out.find("1 - Хлеб ржаной").unwrap();
        let white = out.find("2 - Хлеб белый").unwrap();
        assert!(rye < white);
        assert!(out.ends_with("Работа завершена.\n"));
    }

    #[test]
    fn test_session_no_results() {
        let catalog = catalog();
        let (_, out) = run("сыр\nEXIT\n", Session::new(&catalog));
        assert!(out.contains("Не найдено ни одной позиции."));
    }

    #[test]
    fn test_session_stops_at_end_of_input() {
        let catalog = catalog();
        let (served, out) = run("молоко\n", Session::new(&catalog));
        assert_eq!(served, 1);
        assert!(out.contains("1 - Молоко"));
        assert!(out.contains("Работа завершена."));
    }

    #[test]
    fn test_session_custom_exit_keyword() {
        let catalog = catalog();
        let session = Session::new(&catalog).with_exit_keyword("выход");
        let (served, out) = run("exit\nВыход\nмолоко\n", session);
        assert_eq!(served, 1);
        assert!(out.contains("\"выход\""));
    }

    #[test]
    fn test_session_handles_crlf_input() {
        let catalog = catalog();
        let (served, _) = run("молоко\r\nexit\r\n", Session::new(&catalog));
        assert_eq!(served, 1);
    }
}
