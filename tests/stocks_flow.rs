use chrono::NaiveDate;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use psx_data_reader::models::{StockData, TickerSelection};
use psx_data_reader::{AppConfig, Error, PsxReader};

fn reader_for(server: &MockServer) -> PsxReader {
    let mut config = AppConfig::default();
    config.transport.base_url = server.uri();
    PsxReader::new(config).unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn month_table(rows: &[(&str, &str, &str)]) -> String {
    let body: String = rows
        .iter()
        .map(|(date, close, volume)| {
            format!(
                "<tr><td>{}</td><td>10.00</td><td>12.00</td><td>9.50</td><td>{}</td><td>{}</td></tr>",
                date, close, volume
            )
        })
        .collect();
    format!(
        "<table><tr><th>Date</th><th>Open</th><th>High</th><th>Low</th><th>Close</th><th>Volume</th></tr>{}</table>",
        body
    )
}

const SYMBOLS_JSON: &str = r#"[
    {"symbol": "OGDC", "name": "Oil & Gas Development", "sectorName": "E&P", "isETF": false, "isDebt": false},
    {"symbol": "TFC1", "name": "Term Finance Certificate", "isDebt": true},
    {"symbol": "HBL", "name": "Habib Bank", "isDebt": false}
]"#;

#[tokio::test]
async fn single_symbol_returns_sorted_coerced_series() {
    let server = MockServer::start().await;

    // February completes before January; the merge must re-sort.
    Mock::given(method("POST"))
        .and(path("/historical"))
        .and(body_string_contains("month=1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(month_table(&[
            ("Jan 16, 2024", "101.25", "1,000"),
            ("Jan 15, 2024", "100.10", "10,500"),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/historical"))
        .and(body_string_contains("month=2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(month_table(&[(
            "Feb 1, 2024",
            "102.00",
            "2,000",
        )])))
        .mount(&server)
        .await;

    let reader = reader_for(&server);
    let data = reader
        .stocks(&TickerSelection::from("OGDC"), d(2024, 1, 1), d(2024, 2, 28))
        .await
        .unwrap();

    let StockData::Single(frame) = data else {
        panic!("single symbol must return an unkeyed series");
    };

    let dates: Vec<NaiveDate> = frame.bars.iter().map(|b| b.date).collect();
    assert_eq!(dates, vec![d(2024, 1, 15), d(2024, 1, 16), d(2024, 2, 1)]);
    assert_eq!(frame.bars[0].volume, Some(10_500.0));
    assert_eq!(frame.bars[0].close, Some(100.10));
    assert_eq!(frame.bars[2].volume, Some(2_000.0));
}

#[tokio::test]
async fn one_failed_month_aborts_the_symbol() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/historical"))
        .and(body_string_contains("month=2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/historical"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(month_table(&[("Jan 3, 2024", "50.0", "100")])),
        )
        .mount(&server)
        .await;

    let reader = reader_for(&server);
    let err = reader
        .stocks(&TickerSelection::from("OGDC"), d(2024, 1, 1), d(2024, 3, 31))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn empty_months_are_not_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/historical"))
        .and(body_string_contains("month=1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<table></table>"))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/historical"))
        .and(body_string_contains("month=2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(month_table(&[(
            "Feb 6, 2024",
            "77.7",
            "900",
        )])))
        .mount(&server)
        .await;

    let reader = reader_for(&server);
    let data = reader
        .stocks(&TickerSelection::from("OGDC"), d(2024, 1, 1), d(2024, 2, 28))
        .await
        .unwrap();

    assert_eq!(data.row_count(), 1);
}

#[tokio::test]
async fn all_selection_filters_debt_and_keys_by_symbol() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/symbols"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SYMBOLS_JSON))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/historical"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(month_table(&[("Jan 2, 2024", "10.0", "5")])),
        )
        .mount(&server)
        .await;

    let reader = reader_for(&server);
    let data = reader
        .stocks(&TickerSelection::All, d(2024, 1, 1), d(2024, 1, 31))
        .await
        .unwrap();

    let StockData::Multi(frames) = data else {
        panic!("multiple symbols must return a keyed result");
    };

    let symbols: Vec<&str> = frames.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["OGDC", "HBL"]);
    assert!(frames.iter().all(|s| s.frame.len() == 1));
}

#[tokio::test]
async fn explicit_list_preserves_request_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/historical"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(month_table(&[("Jan 2, 2024", "10.0", "5")])),
        )
        .mount(&server)
        .await;

    let reader = reader_for(&server);
    let data = reader
        .stocks(
            &TickerSelection::Many(vec!["HBL".into(), "OGDC".into()]),
            d(2024, 1, 1),
            d(2024, 1, 31),
        )
        .await
        .unwrap();

    let StockData::Multi(frames) = data else {
        panic!("two symbols must return a keyed result");
    };
    let symbols: Vec<&str> = frames.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["HBL", "OGDC"]);
}

#[tokio::test]
async fn reversed_window_fails_without_touching_the_network() {
    let server = MockServer::start().await;
    let reader = reader_for(&server);

    let err = reader
        .stocks(&TickerSelection::from("OGDC"), d(2024, 2, 1), d(2024, 1, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidRange { .. }));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn tickers_deserializes_the_master_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/symbols"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SYMBOLS_JSON))
        .mount(&server)
        .await;

    let reader = reader_for(&server);
    let tickers = reader.tickers().await.unwrap();

    assert_eq!(tickers.len(), 3);
    assert!(tickers.iter().any(|t| t.symbol == "TFC1" && t.is_debt));
    assert_eq!(tickers[0].sector_name.as_deref(), Some("E&P"));
}

#[tokio::test]
async fn window_slice_drops_rows_outside_the_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/historical"))
        .respond_with(ResponseTemplate::new(200).set_body_string(month_table(&[
            ("Jan 5, 2024", "10.0", "1"),
            ("Jan 20, 2024", "11.0", "2"),
        ])))
        .mount(&server)
        .await;

    let reader = reader_for(&server);
    let data = reader
        .stocks(&TickerSelection::from("OGDC"), d(2024, 1, 10), d(2024, 1, 31))
        .await
        .unwrap();

    let StockData::Single(frame) = data else {
        panic!("expected unkeyed series");
    };
    assert_eq!(frame.len(), 1);
    assert_eq!(frame.bars[0].date, d(2024, 1, 20));
}
