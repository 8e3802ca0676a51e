use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::types::EnforcementAction;

const DISPLAY_DATE_FORMAT: &str = "%B %d, %Y";

static RE_LONG_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},\s+\d{4}",
    )
    .expect("invalid regex: long date")
});

// chrono's %B also takes "Feb" and %Y takes signed years; listing dates are
// only ever a full month name and a four digit year.
static RE_DISPLAY_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},\s+\d{4}$",
    )
    .expect("invalid regex: display date")
});

// `blocks` also counts blocks skipped for lacking a heading link.
#[derive(Debug, Default)]
pub(crate) struct ListingPage {
    pub blocks: usize,
    pub actions: Vec<EnforcementAction>,
}

fn elem_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn absolute_link(href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", crate::SITE_ORIGIN, href)
    }
}

pub(crate) fn parse_display_date(text: &str) -> Option<NaiveDate> {
    if !RE_DISPLAY_DATE.is_match(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, DISPLAY_DATE_FORMAT).ok()
}

// A parent with two `h2` children is visited twice.
pub(crate) fn parse_listing_page(html: &str) -> ListingPage {
    let document = Html::parse_document(html);
    let h2_selector = Selector::parse("h2").expect("invalid selector: h2");

    let blocks: Vec<ElementRef> = document
        .select(&h2_selector)
        .filter_map(|h2| h2.parent().and_then(ElementRef::wrap))
        .collect();

    let actions = blocks.iter().filter_map(|block| extract_item(*block)).collect();

    ListingPage {
        blocks: blocks.len(),
        actions,
    }
}

pub(crate) fn extract_item(item: ElementRef) -> Option<EnforcementAction> {
    let heading_selector = Selector::parse("h2, h3").expect("invalid selector: heading");
    let link_selector = Selector::parse("a").expect("invalid selector: a");
    let time_selector = Selector::parse("time").expect("invalid selector: time");
    let li_selector = Selector::parse("li").expect("invalid selector: li");

    let Some(heading) = item.select(&heading_selector).next() else {
        log::debug!("Skipping item without heading");
        return None;
    };
    let Some(anchor) = heading.select(&link_selector).next() else {
        log::debug!("Skipping item whose heading has no link");
        return None;
    };

    let title = normalize_whitespace(&elem_text(anchor));
    let href = anchor.value().attr("href").map(str::trim).unwrap_or_default();
    if title.is_empty() || href.is_empty() {
        log::debug!("Skipping item with empty title or link");
        return None;
    }

    let date_text = item
        .select(&time_selector)
        .next()
        .map(|time| elem_text(time).trim().to_string())
        .or_else(|| {
            RE_LONG_DATE
                .find(&elem_text(item))
                .map(|m| m.as_str().to_string())
        });

    let categories: Vec<String> = item
        .select(&li_selector)
        .map(|li| elem_text(li).trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();
    let category_text = (!categories.is_empty()).then(|| categories.join(", "));

    Some(EnforcementAction {
        title,
        date_text,
        date_value: None,
        category_text,
        link: absolute_link(href),
    })
}
