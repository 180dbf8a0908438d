pub mod form;

use std::sync::{mpsc, Arc};
use std::thread;

use eframe::egui;
use news_engine::{Classifier, Label, NewsClassifier};

use crate::config::AppConfig;
use crate::service::{self, AnalyzeError, Analysis};
use form::{InputMode, InputState, Outcome};

const FAKE_COLOR: egui::Color32 = egui::Color32::from_rgb(211, 47, 47);
const REAL_COLOR: egui::Color32 = egui::Color32::from_rgb(56, 142, 60);

pub struct DetectorApp {
    classifier: Option<Arc<dyn Classifier>>,
    load_error: Option<String>,

    input: InputState,
    outcome: Option<Outcome>,

    // Runtime only
    is_analyzing: bool,
    rx: Option<mpsc::Receiver<Result<Analysis, AnalyzeError>>>,
}

impl DetectorApp {
    pub fn new(classifier: Result<Arc<dyn Classifier>, String>) -> Self {
        let (classifier, load_error) = match classifier {
            Ok(c) => (Some(c), None),
            Err(e) => (None, Some(e)),
        };
        Self {
            classifier,
            load_error,
            input: InputState::default(),
            outcome: None,
            is_analyzing: false,
            rx: None,
        }
    }

    fn analyze(&mut self) {
        let Some(classifier) = self.classifier.clone() else {
            return;
        };
        let Some(input) = self.input.to_raw_input() else {
            self.outcome = Some(Outcome::Warning(form::EMPTY_INPUT_WARNING.to_string()));
            return;
        };

        let (tx, rx) = mpsc::channel();
        self.rx = Some(rx);
        self.is_analyzing = true;
        self.outcome = None;

        thread::spawn(move || {
            let result = service::analyze(classifier.as_ref(), input);
            // Receiver gone means the window closed.
            let _ = tx.send(result);
        });
    }

    fn poll_worker(&mut self, ctx: &egui::Context) {
        let Some(rx) = &self.rx else {
            return;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.outcome = Some(Outcome::from_analysis(result));
                self.finish();
            }
            Err(mpsc::TryRecvError::Empty) => ctx.request_repaint(),
            Err(mpsc::TryRecvError::Disconnected) => {
                self.outcome = Some(Outcome::Error(form::ANALYSIS_FAILED_ERROR.to_string()));
                self.finish();
            }
        }
    }

    fn finish(&mut self) {
        self.is_analyzing = false;
        self.rx = None;
    }

    fn input_ui(&mut self, ui: &mut egui::Ui) {
        egui::ComboBox::from_label("Choose input method")
            .selected_text(self.input.mode.label())
            .show_ui(ui, |ui| {
                for mode in InputMode::ALL {
                    ui.selectable_value(&mut self.input.mode, mode, mode.label());
                }
            });
        ui.add_space(8.0);

        match self.input.mode {
            InputMode::PlainText => {
                ui.label("Enter the news article text:");
                ui.add(
                    egui::TextEdit::multiline(&mut self.input.plain_text)
                        .hint_text("Paste the news article text here...")
                        .desired_rows(10)
                        .desired_width(f32::INFINITY),
                );
            }
            InputMode::Json => {
                ui.label("Enter JSON data:");
                ui.add(
                    egui::TextEdit::multiline(&mut self.input.json_text)
                        .hint_text(r#"{"title": "Article Title", "body": "Article content...", "author": "Author Name"}"#)
                        .code_editor()
                        .desired_rows(10)
                        .desired_width(f32::INFINITY),
                );
            }
            InputMode::MultipleFields => {
                let form = &mut self.input.form;
                ui.strong("Enter article details:");
                egui::Grid::new("article_form")
                    .num_columns(4)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Title/Headline:");
                        ui.add(egui::TextEdit::singleline(&mut form.title).hint_text("Article title..."));
                        ui.label("Source:");
                        ui.add(egui::TextEdit::singleline(&mut form.source).hint_text("News source..."));
                        ui.end_row();

                        ui.label("Author:");
                        ui.add(egui::TextEdit::singleline(&mut form.author).hint_text("Author name..."));
                        ui.label("Date:");
                        ui.add(egui::TextEdit::singleline(&mut form.date).hint_text("Publication date..."));
                        ui.end_row();
                    });
                ui.label("Article Body:");
                ui.add(
                    egui::TextEdit::multiline(&mut form.body)
                        .hint_text("Main article content...")
                        .desired_rows(7)
                        .desired_width(f32::INFINITY),
                );
            }
        }
    }

    fn outcome_ui(&self, ui: &mut egui::Ui) {
        match &self.outcome {
            None => {}
            Some(Outcome::Warning(msg)) => {
                ui.colored_label(egui::Color32::from_rgb(230, 160, 0), msg);
            }
            Some(Outcome::Error(msg)) => {
                ui.colored_label(egui::Color32::LIGHT_RED, msg);
            }
            Some(Outcome::Result {
                label,
                confidence_pct,
                preview,
            }) => {
                ui.heading("Results");
                ui.collapsing("Processed Text (first 300 characters)", |ui| {
                    ui.monospace(preview);
                });

                let fill = match label {
                    Label::Fake => FAKE_COLOR,
                    Label::Real => REAL_COLOR,
                };
                egui::Frame::none()
                    .fill(fill)
                    .rounding(10.0)
                    .inner_margin(16.0)
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(
                            egui::RichText::new(format!("Prediction: {}", label))
                                .heading()
                                .color(egui::Color32::WHITE),
                        );
                        ui.label(
                            egui::RichText::new(format!("Confidence: {}", confidence_pct))
                                .color(egui::Color32::WHITE),
                        );
                    });
                ui.add_space(6.0);
                ui.label(form::advisory(*label));
            }
        }
    }
}

fn about_ui(ui: &mut egui::Ui) {
    ui.collapsing("About the Model & Supported Formats", |ui| {
        ui.strong("Model Information");
        ui.label("• Model Type: RoBERTa (Robustly Optimized BERT Pretraining Approach)");
        ui.label("• Task: Binary Classification (Real vs Fake News)");
        ui.label("• Training: Fine-tuned on a dataset of real and fake news articles");
        ui.add_space(6.0);

        ui.strong("Supported Input Formats");
        ui.label("1. Plain Text: Direct text input");
        ui.label("2. JSON Format: Structured data with fields like title, body, content, etc.");
        ui.label("3. Multiple Fields: Separate inputs for title, author, body, etc.");
        ui.add_space(6.0);

        ui.strong("How to Use");
        for (i, step) in form::HOW_TO_USE.iter().enumerate() {
            ui.label(format!("{}. {}", i + 1, step));
        }
        ui.add_space(6.0);

        ui.strong("Important Note");
        ui.label(
            "This tool is meant to assist in identifying potentially fake news but should not \
             be the sole basis for determining the veracity of news articles. Always verify \
             information from multiple reliable sources.",
        );
    });
}

impl eframe::App for DetectorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("📰 Fake News Detector");
                ui.label(
                    "This application uses a RoBERTa-based model to detect whether a news article \
                     is likely to be real or fake. Enter the text of a news article below to analyze it.",
                );
                ui.separator();

                if let Some(err) = &self.load_error {
                    ui.colored_label(
                        egui::Color32::LIGHT_RED,
                        "Error loading the model. Please ensure the model is trained and available.",
                    );
                    ui.small(err);
                    return;
                }

                self.input_ui(ui);
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    let button = egui::Button::new("Analyze").min_size([90.0, 30.0].into());
                    if ui.add_enabled(!self.is_analyzing, button).clicked() {
                        self.analyze();
                    }
                    if self.is_analyzing {
                        ui.spinner();
                        ui.label("Analyzing the text...");
                    }
                });
                ui.add_space(8.0);

                self.outcome_ui(ui);
                ui.separator();
                about_ui(ui);
            });
        });
    }
}

/// Load the model once, then open the window.
pub fn run(config: &AppConfig) -> eframe::Result<()> {
    let opts = config.model.classifier_options();
    let classifier = NewsClassifier::load_dir(&config.model.model_path, &opts)
        .map(|c| Arc::new(c) as Arc<dyn Classifier>)
        .map_err(|e| {
            tracing::error!("Error loading model: {}", e);
            e.to_string()
        });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 780.0])
            .with_title("Fake News Detector"),
        ..Default::default()
    };

    eframe::run_native(
        "fake_news_detector",
        options,
        Box::new(|_cc| Box::new(DetectorApp::new(classifier))),
    )
}
