//! Terminal rendering of batch results.

use std::fmt::Write as _;

use plantseg_models::{classify, BatchReport, ImageResult};
use plantseg_report::{AggregationStrategy, DisplaySummary, StatisticalSummary};

const COLUMN_HEADERS: [&str; 4] = [
    "Класс",
    "Средняя уверенность",
    "Суммарная площадь",
    "Суммарная длина",
];
const CLASS_WIDTH: usize = 10;
const VALUE_WIDTH: usize = 22;

/// Render the whole report, one section per image in batch order.
pub fn render_report(report: &BatchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Результаты анализа ({} изображений)", report.len());

    for result in report {
        out.push('\n');
        render_image(&mut out, result);
    }
    out
}

fn render_image(out: &mut String, result: &ImageResult) {
    let _ = writeln!(out, "📄 {}", result.file_name);
    let _ = writeln!(out, "Тип растения: {}", classify(&result.file_name));

    if let Some(error) = &result.error {
        let _ = writeln!(out, "Ошибка: {}", error);
    } else if result.has_detections() {
        render_summary(out, &StatisticalSummary.aggregate(&result.detections));
    } else {
        let _ = writeln!(out, "На этом изображении ничего не обнаружено.");
    }
}

fn render_summary(out: &mut String, summary: &DisplaySummary) {
    let _ = writeln!(
        out,
        "{:<cw$} {:<vw$} {:<vw$} {}",
        COLUMN_HEADERS[0],
        COLUMN_HEADERS[1],
        COLUMN_HEADERS[2],
        COLUMN_HEADERS[3],
        cw = CLASS_WIDTH,
        vw = VALUE_WIDTH
    );
    for class in summary.iter() {
        let _ = writeln!(
            out,
            "{:<cw$} {:<vw$} {:<vw$} {}",
            class.part.display_name(),
            class.format_confidence(),
            class.format_area(),
            class.format_length(),
            cw = CLASS_WIDTH,
            vw = VALUE_WIDTH
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantseg_models::Detection;

    #[test]
    fn test_render_sections() {
        let report = BatchReport::new(vec![
            ImageResult::success(
                "rucola_01.png",
                vec![
                    Detection::new("leaf", 0.8).with_area(2.0).with_length(9.0),
                    Detection::new("leaf", 0.6).with_area(1.0),
                    Detection::new("root", 0.9).with_length(4.0),
                    Detection::new("root", 0.9).with_length(6.0),
                ],
            ),
            ImageResult::failure("wheat.jpg", "Файл повреждён"),
            ImageResult::success("random.png", vec![]),
        ]);

        let text = render_report(&report);

        assert!(text.starts_with("Результаты анализа (3 изображений)"));
        assert!(text.contains("Тип растения: Руккола"));
        assert!(text.contains("Тип растения: Пшеница"));
        assert!(text.contains("Тип растения: Не определено"));
        assert!(text.contains("70.0%"));
        assert!(text.contains("3.0 см²"));
        assert!(text.contains("10.0 см"));
        assert!(!text.contains("9.0 см"));
        assert!(text.contains("Ошибка: Файл повреждён"));
        assert!(text.contains("На этом изображении ничего не обнаружено."));

        let rucola = text.find("rucola_01.png").unwrap();
        let wheat = text.find("wheat.jpg").unwrap();
        assert!(rucola < wheat);
    }
}
