//! Booking-card extraction from confinement page markup.
//!
//! Each page is a fragment of repeated `div.booking-card` blocks. Extraction
//! walks the blocks with CSS selectors and pulls a [`RosterRecord`] out of
//! each one. A malformed block is skipped with a logged reason and never
//! aborts the rest of the page.
//!
//! All entry points are synchronous because the `scraper` crate's DOM types
//! are `!Send` — the async fetch path wraps calls in
//! `tokio::task::spawn_blocking`.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::roster::RosterRecord;

/// The recognized detail-row labels. Matching is by substring so trailing
/// markup noise around the label text does not matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailLabel {
    Booked,
    ArrestDateTime,
    ArrestingAgency,
    BondTotal,
}

impl DetailLabel {
    fn from_label(label: &str) -> Option<Self> {
        if label.contains("Booked:") {
            Some(Self::Booked)
        } else if label.contains("Arrest Date/Time:") {
            Some(Self::ArrestDateTime)
        } else if label.contains("Arresting Agency:") {
            Some(Self::ArrestingAgency)
        } else if label.contains("Bond Total:") {
            Some(Self::BondTotal)
        } else {
            None
        }
    }
}

struct CardSelectors {
    card: Selector,
    header: Selector,
    detail_row: Selector,
    detail_label: Selector,
    detail_value: Selector,
    charge_details: Selector,
    inner_div: Selector,
    mugshot: Selector,
    booking_link: Selector,
}

impl CardSelectors {
    fn new() -> Option<Self> {
        Some(Self {
            card: Selector::parse("div.booking-card").ok()?,
            header: Selector::parse("h5").ok()?,
            detail_row: Selector::parse("div.detail-row").ok()?,
            detail_label: Selector::parse("span.detail-label").ok()?,
            detail_value: Selector::parse("span.detail-value").ok()?,
            charge_details: Selector::parse("div.charge-item div.charge-details").ok()?,
            inner_div: Selector::parse("div").ok()?,
            mugshot: Selector::parse("img.booking-mugshot").ok()?,
            booking_link: Selector::parse(r#"a[href*="BookingID="]"#).ok()?,
        })
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Extract every well-formed booking card on a page into roster records.
///
/// `page` is the 1-based page index, recorded on each record and used in log
/// lines so a skipped card can be traced back to its source page.
pub fn extract_records(html: &str, page: u32) -> Vec<RosterRecord> {
    let Some(selectors) = CardSelectors::new() else {
        return Vec::new();
    };
    let Ok(booking_id_re) = Regex::new(r"BookingID=(\d+)") else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut records = Vec::new();
    for card in document.select(&selectors.card) {
        match extract_card(card, &selectors, &booking_id_re, page) {
            Ok(record) => records.push(record),
            Err(reason) => warn!("page {page}: skipping booking card: {reason}"),
        }
    }
    records
}

fn extract_card(
    card: ElementRef<'_>,
    selectors: &CardSelectors,
    booking_id_re: &Regex,
    page: u32,
) -> Result<RosterRecord, &'static str> {
    let header = card
        .select(&selectors.header)
        .next()
        .ok_or("no name header")?;
    let full_name = element_text(header);

    // The roster displays names in last-first-middle order.
    let tokens: Vec<&str> = full_name.split_whitespace().collect();
    let (last_name, first_name, middle_name) = match tokens.as_slice() {
        [] => return Err("empty name header"),
        [_single] => return Err("single-token name cannot be keyed"),
        [last, first] => (last.to_string(), first.to_string(), String::new()),
        [last, first, middle @ ..] => (last.to_string(), first.to_string(), middle.join(" ")),
    };

    let mut booking_date = None;
    let mut arrest_datetime = None;
    let mut arresting_agency = None;
    let mut bond_amount = None;
    for row in card.select(&selectors.detail_row) {
        let label_el = row.select(&selectors.detail_label).next();
        let value_el = row.select(&selectors.detail_value).next();
        let (Some(label_el), Some(value_el)) = (label_el, value_el) else {
            continue;
        };
        let label = element_text(label_el);
        let value = element_text(value_el);
        match DetailLabel::from_label(&label) {
            Some(DetailLabel::Booked) => booking_date = Some(value),
            Some(DetailLabel::ArrestDateTime) => arrest_datetime = Some(value),
            Some(DetailLabel::ArrestingAgency) => arresting_agency = Some(value),
            Some(DetailLabel::BondTotal) => bond_amount = Some(value),
            None => debug!("page {page}: unrecognized detail label {label:?}"),
        }
    }

    let mut charge_list = Vec::new();
    for details in card.select(&selectors.charge_details) {
        // First inner div holds the charge description.
        if let Some(text) = details.select(&selectors.inner_div).next() {
            let charge = element_text(text);
            if !charge.is_empty() {
                charge_list.push(charge);
            }
        }
    }
    let charges = if charge_list.is_empty() {
        None
    } else {
        Some(charge_list.join("; "))
    };

    let mugshot_url = card
        .select(&selectors.mugshot)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string);

    let booking_number = card
        .select(&selectors.booking_link)
        .next()
        .and_then(|link| link.value().attr("href"))
        .and_then(|href| booking_id_re.captures(href))
        .map(|captures| captures[1].to_string());

    Ok(RosterRecord {
        full_name,
        first_name,
        middle_name,
        last_name,
        booking_number,
        booking_date,
        arrest_datetime,
        arresting_agency,
        bond_amount,
        charges,
        mugshot_url,
        page,
    })
}
