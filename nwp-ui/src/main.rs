use std::time::Duration;

use eframe::{egui, Frame};
use egui::Context;

use reqwest::blocking::Client;
use reqwest::Result;
use serde::Deserialize;

const SERVER: &str = "http://127.0.0.1:5000";

/// Model details reported by `/v1/info`.
#[derive(Deserialize, Debug)]
struct Info {
    window: usize,
    vocabulary_size: usize,
    temperature: f32,
    max_words: usize,
}

/// REST context holding a reusable blocking HTTP client.
struct RESTContext {
    client: Client,
}

impl RESTContext {
    /// Creates a new REST context with a timeout.
    fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::new(5, 0))
            .build()?;
        Ok(Self { client })
    }

    /// Sends a GET request to `/v1/generate` with the prompt and word count.
    fn get_generated(&self, prompt: &str, count: usize) -> Result<String> {
        let response = self.client
            .get(format!("{SERVER}/v1/generate"))
            .query(&[("prompt", prompt.to_owned()), ("count", count.to_string())])
            .send()?
            .error_for_status()?;

        response.text()
    }

    /// Sends a GET request to `/v1/info`.
    fn get_info(&self) -> Result<Info> {
        self.client
            .get(format!("{SERVER}/v1/info"))
            .send()?
            .error_for_status()?
            .json()
    }
}

/// Global UI state (MUST persist between frames in egui).
struct GeneratorUI {
    rest: RESTContext,
    prompt: String,
    count: usize,
    info: Option<Info>,
    output: Option<String>,
}

impl GeneratorUI {
    /// Initializes the UI with the same defaults as the server page.
    fn new() -> Result<Self> {
        let mut generator = Self {
            rest: RESTContext::new()?,
            prompt: "The movie was".to_owned(),
            count: 8,
            info: None,
            output: None,
        };
        generator.get_info();
        Ok(generator)
    }

    /// Upper bound of the word-count slider.
    fn max_words(&self) -> usize {
        self.info.as_ref().map_or(20, |info| info.max_words)
    }

    /// Performs the generation request.
    fn get_generated(&mut self) {
        match self.rest.get_generated(&self.prompt, self.count) {
            Ok(text) => self.output = Some(text),
            Err(e) => self.output = Some(format!("Error: {e}")),
        }
    }

    /// Performs the info request.
    fn get_info(&mut self) {
        match self.rest.get_info() {
            Ok(info) => self.info = Some(info),
            Err(e) => self.output = Some(format!("Error: {e}")),
        }
    }
}

impl eframe::App for GeneratorUI {
    /// UI update loop (called every frame).
    fn update(&mut self, ctx: &Context, _: &mut Frame) {
        egui::SidePanel::left("settings").show(ctx, |ui| {
            ui.heading("App Settings");
            ui.separator();
            ui.label("Next-Word Generator");
            match &self.info {
                Some(info) => {
                    ui.label(format!("Window: {} words", info.window));
                    ui.label(format!("Vocabulary: {} entries", info.vocabulary_size));
                    ui.label(format!("Temperature: {}", info.temperature));
                }
                None => {
                    ui.label("Server not reachable");
                }
            }
            if ui.button("Refresh").clicked() {
                self.get_info();
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading(egui::RichText::new("AI Text Generator").color(egui::Color32::from_rgb(0xff, 0x99, 0x00)));
            });
            ui.add_space(12.0);

            ui.label("Starting Text");
            ui.text_edit_singleline(&mut self.prompt);
            ui.add_space(8.0);

            ui.label("Words to Generate");
            let max_words = self.max_words();
            ui.add(egui::Slider::new(&mut self.count, 1..=max_words));
            ui.add_space(8.0);

            if ui
                .add_sized([ui.available_width(), 40.0], egui::Button::new("Generate Text"))
                .clicked()
            {
                self.get_generated();
            }
            ui.add_space(16.0);

            egui::Frame::group(ui.style()).show(ui, |ui| {
                match &self.output {
                    Some(text) => {
                        ui.label(egui::RichText::new("Generated Text").strong());
                        ui.label(egui::RichText::new(text).size(18.0));
                    }
                    None => {
                        ui.label("Click Generate to start");
                    }
                }
            });
        });
    }
}

/// Application entry point.
fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 380.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "nwp-generator",
        options,
        Box::new(|_| Ok(Box::new(GeneratorUI::new()?))),
    )
}
