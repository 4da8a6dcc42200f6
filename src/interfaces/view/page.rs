use crate::interfaces::view::document::{Document, Element, I18N_PLACEHOLDER_ATTR};

pub const PREDICTION_FORM_ID: &str = "predictionForm";
pub const AIRLINE_SELECT_ID: &str = "aerolinea";
pub const ORIGIN_SELECT_ID: &str = "origen";
pub const DESTINATION_SELECT_ID: &str = "destino";
pub const DEPARTURE_INPUT_ID: &str = "fechaPartida";
pub const SUBMIT_BUTTON_ID: &str = "submitBtn";
pub const RESULTS_SECTION_ID: &str = "resultsSection";
pub const STATUS_INDICATOR_ID: &str = "statusIndicator";
pub const STATS_SECTION_ID: &str = "statsSection";

fn select(id: &str, placeholder_key: &str) -> Element {
    Element::new("select")
        .with_id(id)
        .with_child(Element::new("option").with_key(placeholder_key).with_text(""))
}

fn field(label_key: &str, control: Element) -> Element {
    Element::new("div")
        .with_attr("class", "form-group")
        .with_child(Element::new("label").with_key(label_key).with_text(""))
        .with_child(control)
}

/// The prediction page: header, form, results and statistics sections
pub fn prediction_page() -> Document {
    let header = Element::new("header")
        .with_child(Element::new("h1").with_key("header.title").with_text("FlightOnTime"))
        .with_child(
            Element::new("div")
                .with_id(STATUS_INDICATOR_ID)
                .with_child(Element::new("span").with_id("statusText").with_text("")),
        );

    let form = Element::new("form")
        .with_id(PREDICTION_FORM_ID)
        .with_child(Element::new("h2").with_key("form.title").with_text(""))
        .with_child(Element::new("p").with_key("form.description").with_text(""))
        .with_child(field("form.airline", select(AIRLINE_SELECT_ID, "form.airline.select")))
        .with_child(field("form.origin", select(ORIGIN_SELECT_ID, "form.origin.select")))
        .with_child(field(
            "form.destination",
            select(DESTINATION_SELECT_ID, "form.destination.select"),
        ))
        .with_child(field(
            "form.departure",
            Element::new("input")
                .with_id(DEPARTURE_INPUT_ID)
                .with_attr("type", "datetime-local")
                .with_attr(I18N_PLACEHOLDER_ATTR, "form.departure"),
        ))
        .with_child(
            Element::new("button")
                .with_id(SUBMIT_BUTTON_ID)
                .with_attr("type", "submit")
                .with_key("form.submit")
                .with_child(Element::new("span").with_text("")),
        )
        .with_child(
            Element::new("button")
                .with_attr("type", "reset")
                .with_key("button.clear.form")
                .with_text(""),
        );

    let results = Element::new("section")
        .with_id(RESULTS_SECTION_ID)
        .with_child(
            Element::new("h2")
                .with_key("results.title")
                .with_child(Element::new("svg").with_id("predictionIcon"))
                .with_text(""),
        )
        .with_child(Element::new("div").with_id("resultContent"))
        .with_child(
            Element::new("div")
                .with_key("metadata.title")
                .with_child(Element::new("svg"))
                .with_child(Element::new("div").with_id("metadataContent")),
        )
        .with_child(Element::new("button").with_key("button.new.query").with_text(""));

    let stats = Element::new("section")
        .with_id(STATS_SECTION_ID)
        .with_child(Element::new("h2").with_key("stats.detailed.title").with_text(""))
        .with_child(Element::new("p").with_key("loading.stats").with_text(""));

    let settings = Element::new("aside")
        .with_child(Element::new("h3").with_key("settings.title").with_text(""))
        .with_child(Element::new("label").with_key("settings.language").with_text(""))
        .with_child(
            Element::new("select")
                .with_id("languageSelect")
                .with_child(Element::new("option").with_attr("value", "es").with_text("Español"))
                .with_child(Element::new("option").with_attr("value", "en").with_text("English")),
        )
        .with_child(Element::new("label").with_key("settings.units").with_text(""))
        .with_child(
            Element::new("select")
                .with_id("unitSelect")
                .with_child(
                    Element::new("option")
                        .with_attr("value", "km")
                        .with_key("settings.units.km")
                        .with_text(""),
                )
                .with_child(
                    Element::new("option")
                        .with_attr("value", "miles")
                        .with_key("settings.units.miles")
                        .with_text(""),
                ),
        );

    Document::new(
        Element::new("body")
            .with_child(header)
            .with_child(settings)
            .with_child(form)
            .with_child(results)
            .with_child(stats),
    )
}
