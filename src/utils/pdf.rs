//! PDF 文档生成（收据、成绩单、收入报表）
//!
//! 使用 printpdf 内置字体，A4 纵向，内容超出一页时自动换页。
//! 收据右上角绘制校验二维码，二维码按行合并深色模块后以填充多边形绘制。

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};
use qrcode::{Color as QrColor, QrCode};

use crate::errors::{AcademiqError, Result};
use crate::models::documents::entities::{IncomeLine, IncomeReport};
use crate::models::grades::entities::ReportCard;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const QR_SIZE: f32 = 42.0;

/// 收据内容
#[derive(Debug, Clone)]
pub struct ReceiptData {
    pub school_name: String,
    pub folio: i64,
    pub student_name: String,
    pub enrollment_code: String,
    pub concept: String,
    pub amount: f64,
    pub method: String,
    pub reference: Option<String>,
    pub date: String,
    pub status: String,
    pub validation_url: String,
}

/// `$12,345.60 MXN`
pub fn format_money(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}${grouped}.{:02} MXN", cents % 100)
}

fn pdf_error(e: impl std::fmt::Display) -> AcademiqError {
    AcademiqError::document_generation(e.to_string())
}

struct PdfWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor: f32,
    pages: usize,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "contenido");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor: PAGE_HEIGHT - MARGIN,
            pages: 1,
        })
    }

    fn line_height(size: f32) -> f32 {
        // pt -> mm，行距 1.4
        size * 0.3528 * 1.4
    }

    fn ensure_space(&mut self, needed: f32) {
        if self.cursor - needed >= MARGIN {
            return;
        }
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("contenido-{}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = PAGE_HEIGHT - MARGIN;
    }

    fn text_at(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer
            .use_text(text, size, Mm(x), Mm(self.cursor), font);
    }

    fn heading(&mut self, text: &str, size: f32) {
        let height = Self::line_height(size);
        self.ensure_space(height);
        self.cursor -= height;
        self.text_at(text, size, MARGIN, true);
    }

    fn paragraph(&mut self, text: &str) {
        let height = Self::line_height(10.0);
        self.ensure_space(height);
        self.cursor -= height;
        self.text_at(text, 10.0, MARGIN, false);
    }

    fn field(&mut self, label: &str, value: &str) {
        let height = Self::line_height(11.0);
        self.ensure_space(height);
        self.cursor -= height;
        self.text_at(label, 11.0, MARGIN, true);
        self.text_at(value, 11.0, MARGIN + 45.0, false);
    }

    /// 表格行：每列为 (相对左边距的 x 偏移, 文本)
    fn row(&mut self, columns: &[(f32, String)], bold: bool) {
        let height = Self::line_height(10.0);
        self.ensure_space(height);
        self.cursor -= height;
        for (offset, text) in columns {
            self.text_at(text, 10.0, MARGIN + offset, bold);
        }
    }

    fn separator(&mut self) {
        self.ensure_space(4.0);
        self.cursor -= 2.0;
        let line = Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(self.cursor)), false),
                (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(self.cursor)), false),
            ],
            is_closed: false,
        };
        self.layer.add_line(line);
        self.cursor -= 2.0;
    }

    fn gap(&mut self, mm: f32) {
        self.cursor -= mm;
    }

    /// 在当前页指定位置绘制二维码（左上角坐标）
    fn qr_code(&self, data: &str, left: f32, top: f32, size: f32) -> Result<()> {
        let code = QrCode::new(data.as_bytes()).map_err(pdf_error)?;
        let width = code.width();
        let colors = code.to_colors();
        let module = size / width as f32;

        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));

        for y in 0..width {
            let mut x = 0;
            while x < width {
                if colors[y * width + x] != QrColor::Dark {
                    x += 1;
                    continue;
                }
                let start = x;
                while x < width && colors[y * width + x] == QrColor::Dark {
                    x += 1;
                }
                let x0 = left + start as f32 * module;
                let x1 = left + x as f32 * module;
                let y1 = top - y as f32 * module;
                let y0 = y1 - module;
                self.layer.add_polygon(Polygon {
                    rings: vec![vec![
                        (Point::new(Mm(x0), Mm(y0)), false),
                        (Point::new(Mm(x1), Mm(y0)), false),
                        (Point::new(Mm(x1), Mm(y1)), false),
                        (Point::new(Mm(x0), Mm(y1)), false),
                    ]],
                    mode: PaintMode::Fill,
                    winding_order: WindingOrder::NonZero,
                });
            }
        }
        Ok(())
    }

    fn save(self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        self.doc
            .save(&mut BufWriter::new(file))
            .map_err(pdf_error)
    }
}

/// 付款收据
pub fn render_receipt(data: &ReceiptData, path: &Path) -> Result<()> {
    let mut pdf = PdfWriter::new(&format!("Recibo {}", data.folio))?;

    // 二维码固定在首页右上角
    pdf.qr_code(
        &data.validation_url,
        PAGE_WIDTH - MARGIN - QR_SIZE,
        PAGE_HEIGHT - MARGIN,
        QR_SIZE,
    )?;

    pdf.heading(&data.school_name, 18.0);
    pdf.heading("Recibo de pago", 14.0);
    pdf.field("Folio:", &format!("{:06}", data.folio));
    pdf.gap(QR_SIZE - 20.0);
    pdf.separator();

    pdf.field("Alumno:", &data.student_name);
    pdf.field("Matrícula:", &data.enrollment_code);
    pdf.field("Concepto:", &data.concept);
    pdf.field("Importe:", &format_money(data.amount));
    pdf.field("Método:", &data.method);
    pdf.field("Referencia:", data.reference.as_deref().unwrap_or("-"));
    pdf.field("Fecha:", &data.date);
    pdf.field("Estatus:", &data.status);
    pdf.separator();

    pdf.paragraph("Valide la autenticidad de este recibo escaneando el código QR o en:");
    pdf.paragraph(&data.validation_url);

    pdf.save(path)
}

/// 成绩单
pub fn render_report_card(school_name: &str, card: &ReportCard, path: &Path) -> Result<()> {
    let mut pdf = PdfWriter::new(&format!("Boleta {}", card.student.enrollment_code))?;

    pdf.heading(school_name, 18.0);
    pdf.heading("Boleta de calificaciones", 14.0);
    pdf.separator();
    pdf.field("Alumno:", &card.student.full_name());
    pdf.field("Matrícula:", &card.student.enrollment_code);
    if let Some(group) = &card.group {
        pdf.field(
            "Grupo:",
            &format!("{} ({}, {})", group.name, group.grade_level, group.cycle),
        );
    }
    pdf.field(
        "Periodo:",
        card.period.as_deref().unwrap_or("Todos los periodos"),
    );
    pdf.separator();

    pdf.row(
        &[
            (0.0, "Materia".to_string()),
            (70.0, "Calificaciones".to_string()),
            (145.0, "Promedio".to_string()),
        ],
        true,
    );
    for subject in &card.subjects {
        let scores = subject
            .scores
            .iter()
            .map(|s| format!("{}: {:.1}", s.period, s.score))
            .collect::<Vec<_>>()
            .join("  ");
        pdf.row(
            &[
                (0.0, subject.subject_name.clone()),
                (70.0, scores),
                (145.0, format_optional(subject.average)),
            ],
            false,
        );
    }
    pdf.separator();
    pdf.field("Promedio general:", &format_optional(card.overall_average));

    let attendance = &card.attendance;
    pdf.gap(4.0);
    pdf.heading("Asistencia", 12.0);
    pdf.paragraph(&format!(
        "Registros: {}  Presente: {}  Ausente: {}  Retardo: {}  Justificado: {}",
        attendance.total, attendance.present, attendance.absent, attendance.late, attendance.excused
    ));
    pdf.field(
        "Asistencia:",
        &attendance
            .attendance_rate
            .map(|r| format!("{r:.2}%"))
            .unwrap_or_else(|| "-".to_string()),
    );

    pdf.save(path)
}

/// 收入报表
pub fn render_income_report(school_name: &str, report: &IncomeReport, path: &Path) -> Result<()> {
    let mut pdf = PdfWriter::new("Reporte de ingresos")?;

    pdf.heading(school_name, 18.0);
    pdf.heading("Reporte de ingresos", 14.0);
    pdf.paragraph(&format!(
        "Del {} al {}",
        report.date_from.format("%Y-%m-%d"),
        report.date_to.format("%Y-%m-%d")
    ));
    pdf.separator();

    income_table(&mut pdf, "Por concepto", &report.by_concept);
    income_table(&mut pdf, "Por método de pago", &report.by_method);

    pdf.separator();
    pdf.field("Pagos:", &report.payment_count.to_string());
    pdf.field("Total:", &format_money(report.total));

    pdf.save(path)
}

fn income_table(pdf: &mut PdfWriter, title: &str, lines: &[IncomeLine]) {
    pdf.gap(2.0);
    pdf.heading(title, 12.0);
    pdf.row(
        &[
            (0.0, "Descripción".to_string()),
            (100.0, "Pagos".to_string()),
            (125.0, "Importe".to_string()),
        ],
        true,
    );
    if lines.is_empty() {
        pdf.paragraph("Sin pagos en el periodo");
    }
    for line in lines {
        pdf.row(
            &[
                (0.0, line.label.clone()),
                (100.0, line.count.to_string()),
                (125.0, format_money(line.total)),
            ],
            false,
        );
    }
}

fn format_optional(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::entities::AttendanceSummary;
    use crate::models::common::EnrollmentStatus;
    use crate::models::grades::entities::{PeriodScore, SubjectAverage};
    use crate::models::students::entities::Student;

    fn assert_pdf(path: &Path) {
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(2500.0), "$2,500.00 MXN");
        assert_eq!(format_money(1234567.891), "$1,234,567.89 MXN");
        assert_eq!(format_money(0.5), "$0.50 MXN");
        assert_eq!(format_money(999.0), "$999.00 MXN");
    }

    #[test]
    fn test_render_receipt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recibos").join("recibo-1.pdf");
        let data = ReceiptData {
            school_name: "Colegio Prueba".to_string(),
            folio: 1,
            student_name: "Ana López".to_string(),
            enrollment_code: "A001".to_string(),
            concept: "Colegiatura".to_string(),
            amount: 2500.0,
            method: "spei".to_string(),
            reference: Some("ACQ-1-1-ABCDEF12".to_string()),
            date: "2025-09-01".to_string(),
            status: "pagado".to_string(),
            validation_url: "http://127.0.0.1:8080/validar?id=1&token=abc".to_string(),
        };
        render_receipt(&data, &path).unwrap();
        assert_pdf(&path);
    }

    #[test]
    fn test_render_report_card_with_many_subjects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("informe-1-all.pdf");
        let now = chrono::Utc::now();
        let subjects = (1..=60)
            .map(|i| SubjectAverage {
                subject_id: i,
                subject_name: format!("Materia {i}"),
                scores: vec![PeriodScore {
                    period: "P1".to_string(),
                    score: 8.0,
                }],
                average: Some(8.0),
            })
            .collect();
        let card = ReportCard {
            student: Student {
                id: 1,
                school_id: 1,
                enrollment_code: "A001".to_string(),
                first_name: "Ana".to_string(),
                last_name: "López".to_string(),
                group_id: None,
                guardian_name: None,
                guardian_email: None,
                guardian_phone: None,
                status: EnrollmentStatus::Active,
                created_at: now,
                updated_at: now,
            },
            group: None,
            period: None,
            subjects,
            overall_average: Some(8.0),
            attendance: AttendanceSummary::default(),
        };
        render_report_card("Colegio Prueba", &card, &path).unwrap();
        assert_pdf(&path);
    }
}
