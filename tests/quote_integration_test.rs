use anyhow::Result;
use httpmock::prelude::*;
use solar_quote::core::{Coordinates, QuoteRequest, SunHoursSource};
use solar_quote::utils::validation::Validate;
use solar_quote::{NasaPowerProvider, QuoteConfig, QuoteError, QuoteService};

fn climatology(ann: f64, jul: f64) -> serde_json::Value {
    serde_json::json!({
        "properties": {
            "parameter": {
                "ALLSKY_SFC_SW_DWN": {
                    "JAN": 6.9, "FEB": 6.4, "MAR": 5.8, "APR": 5.1, "MAY": 4.6, "JUN": 4.2,
                    "JUL": jul, "AUG": 5.3, "SEP": 6.0, "OCT": 6.3, "NOV": 6.5, "DEC": 7.0,
                    "ANN": ann
                },
                "T2M": {"ANN": 16.2},
                "WS2M": {"ANN": 3.4},
                "RH2M": {"ANN": 52.0}
            }
        }
    })
}

fn config_for(server: &MockServer) -> QuoteConfig {
    let toml_content = format!(
        r#"
[defaults]
tariff_per_kwh = 2.5
panel_wattage = 550
sun_hours_per_day = 5.0

[irradiance]
endpoint = "{}"
timeout_seconds = 5
"#,
        server.url("/api/temporal/climatology/point")
    );
    let config = QuoteConfig::from_toml_str(&toml_content).unwrap();
    config.validate().unwrap();
    config
}

fn service_for(config: &QuoteConfig) -> QuoteService<NasaPowerProvider> {
    let provider = NasaPowerProvider::from_config(&config.irradiance).unwrap();
    QuoteService::new(provider, config.engine(), config.sun_hours_policy())
}

fn johannesburg_request() -> QuoteRequest {
    QuoteRequest {
        address: "44 Commissioner Street, Johannesburg".to_string(),
        usage_kwh: Some(500.0),
        bill_rands: None,
        tariff_per_kwh: 2.5,
        panel_wattage: 550,
        coordinates: Some(Coordinates::new(-26.2, 28.04).unwrap()),
        month: None,
    }
}

#[tokio::test]
async fn test_end_to_end_quote_with_measured_irradiance() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/temporal/climatology/point")
            .query_param("latitude", "-26.2")
            .query_param("longitude", "28.04");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(climatology(6.0, 4.9));
    });

    let config = config_for(&server);
    let quote = service_for(&config).quote(&johannesburg_request()).await.unwrap();

    api_mock.assert();
    assert_eq!(quote.inputs.sun_hours_source(), SunHoursSource::Measured);
    assert_eq!(quote.outputs.system_size_kw, 2.78);
    assert_eq!(quote.outputs.panel_count, 6);
    assert_eq!(quote.outputs.inverter_size_kw, 2.22);
    assert_eq!(quote.outputs.monthly_savings, 1000.0);
    assert!(!quote.outputs.used_default_irradiance);

    let irradiance = quote.irradiance.unwrap();
    assert_eq!(irradiance.optimal_month, Some(12));
    assert_eq!(irradiance.humidity, Some(52.0));
}

#[tokio::test]
async fn test_bill_request_matches_usage_request() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/temporal/climatology/point");
        then.status(200).json_body(climatology(6.0, 4.9));
    });

    let config = config_for(&server);
    let service = service_for(&config);

    let by_usage = service.quote(&johannesburg_request()).await.unwrap();
    let by_bill = service
        .quote(&QuoteRequest {
            usage_kwh: None,
            bill_rands: Some(1250.0),
            ..johannesburg_request()
        })
        .await
        .unwrap();

    api_mock.assert_hits(2);
    assert_eq!(by_bill.outputs, by_usage.outputs);
}

#[tokio::test]
async fn test_monthly_quote_uses_month_irradiance() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/temporal/climatology/point");
        then.status(200).json_body(climatology(6.0, 4.0));
    });

    let config = config_for(&server);
    let quote = service_for(&config)
        .quote(&QuoteRequest {
            month: Some(7),
            ..johannesburg_request()
        })
        .await
        .unwrap();

    // 500 / 30 / 4.0
    assert_eq!(quote.outputs.sun_hours_per_day, 4.0);
    assert_eq!(quote.outputs.system_size_kw, 4.17);
    assert_eq!(quote.outputs.panel_count, 8);
}

#[tokio::test]
async fn test_service_outage_falls_back_to_default_sun_hours() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/temporal/climatology/point");
        then.status(503);
    });

    let config = config_for(&server);
    let quote = service_for(&config).quote(&johannesburg_request()).await.unwrap();

    api_mock.assert_hits(1);
    assert!(quote.outputs.used_default_irradiance);
    assert_eq!(quote.outputs.sun_hours_per_day, 5.0);
    assert_eq!(quote.outputs.system_size_kw, 3.33);
    assert!(quote.irradiance.is_none());
}

#[tokio::test]
async fn test_negative_irradiance_reading_falls_back_to_default_sun_hours() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/temporal/climatology/point");
        then.status(200).json_body(climatology(-5.0, 4.9));
    });

    let config = config_for(&server);
    let quote = service_for(&config).quote(&johannesburg_request()).await.unwrap();

    api_mock.assert_hits(1);
    assert!(quote.outputs.used_default_irradiance);
    assert_eq!(quote.outputs.sun_hours_per_day, 5.0);
    assert_eq!(quote.outputs.system_size_kw, 3.33);
}

#[tokio::test]
async fn test_invalid_request_makes_no_http_call() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/temporal/climatology/point");
        then.status(200).json_body(climatology(6.0, 4.9));
    });

    let config = config_for(&server);
    let err = service_for(&config)
        .quote(&QuoteRequest {
            usage_kwh: Some(0.0),
            bill_rands: Some(0.0),
            ..johannesburg_request()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, QuoteError::Validation { .. }));
    api_mock.assert_hits(0);
}

#[tokio::test]
async fn test_quotes_serialise_for_downstream_consumers() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/temporal/climatology/point");
        then.status(200).json_body(climatology(6.0, 4.9));
    });

    let config = config_for(&server);
    let quote = service_for(&config).quote(&johannesburg_request()).await?;
    let json = serde_json::to_value(&quote)?;

    assert_eq!(json["outputs"]["panel_count"], 6);
    assert_eq!(json["outputs"]["used_default_irradiance"], false);
    assert_eq!(json["inputs"]["sun_hours_source"], "measured");
    assert_eq!(json["inputs"]["address"], "44 Commissioner Street, Johannesburg");
    Ok(())
}

#[tokio::test]
async fn test_concurrent_quotes_are_independent() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/temporal/climatology/point");
        then.status(200).json_body(climatology(6.0, 4.9));
    });

    let config = config_for(&server);
    let service = std::sync::Arc::new(service_for(&config));

    let handles: Vec<_> = [300.0, 500.0, 900.0, 1500.0]
        .into_iter()
        .map(|usage| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .quote(&QuoteRequest {
                        usage_kwh: Some(usage),
                        ..johannesburg_request()
                    })
                    .await
            })
        })
        .collect();

    let mut sizes = Vec::new();
    for handle in handles {
        sizes.push(handle.await.unwrap().unwrap().outputs.system_size_kw);
    }

    api_mock.assert_hits(4);
    // 300, 500, 900, 1500 kWh / 30 days / 6 h
    assert_eq!(sizes, vec![1.67, 2.78, 5.0, 8.33]);
}
