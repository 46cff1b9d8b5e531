//! Chart requests: immutable descriptions of the charts a renderer should draw.
//!
//! Each chart is built fresh from the price series and the indicator report.
//! Nothing here draws or touches the filesystem; a rendering layer consumes
//! the serialized requests and places `values[0]` of each series at `offset`.

use crate::domain::PriceSeries;
use crate::engine::IndicatorEngine;
use crate::indicator::IndicatorReport;
use serde::{Deserialize, Serialize};

/// Volume is charted in millions of shares.
const VOLUME_SCALE: f64 = 1e6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStyle {
    Solid,
    Dashed,
    DashDot,
    Dotted,
    Bar,
}

/// One plotted series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    pub style: SeriesStyle,
    pub color: String,
    pub axis: Axis,
    pub offset: usize,
    pub values: Vec<f64>,
}

impl ChartSeries {
    fn new(label: &str, style: SeriesStyle, color: &str, offset: usize, values: Vec<f64>) -> Self {
        Self {
            label: label.to_string(),
            style,
            color: color.to_string(),
            axis: Axis::Primary,
            offset,
            values,
        }
    }

    fn on_secondary(mut self) -> Self {
        self.axis = Axis::Secondary;
        self
    }
}

/// One chart, complete and self-contained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub file_name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub secondary_y_label: Option<String>,
    pub series: Vec<ChartSeries>,
}

impl ChartRequest {
    fn new(file_name: String, title: String, x_label: &str, y_label: &str) -> Self {
        Self {
            file_name,
            title,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            secondary_y_label: None,
            series: Vec::new(),
        }
    }

    fn with(mut self, series: ChartSeries) -> Self {
        self.series.push(series);
        self
    }

    fn with_report_series(
        mut self,
        report: &IndicatorReport,
        name: &str,
        label: &str,
        style: SeriesStyle,
        color: &str,
    ) -> Self {
        if let Some(s) = report.get_series(name) {
            self.series
                .push(ChartSeries::new(label, style, color, s.offset, s.values.clone()));
        }
        self
    }
}

/// Build the chart set for one instrument.
///
/// Indicator series missing from the report are left out of their chart.
pub fn chart_requests(
    ticker: &str,
    prices: &PriceSeries,
    report: &IndicatorReport,
    engine: &IndicatorEngine,
) -> Vec<ChartRequest> {
    let x_label = match prices.date_range() {
        Some((start, end)) => format!("trading days ({start}, {end})"),
        None => "trading days".to_string(),
    };
    let usd = "Value (USD)";
    let volume: Vec<f64> = prices
        .volume()
        .iter()
        .map(|&v| v as f64 / VOLUME_SCALE)
        .collect();
    let ma_days = engine.config().ma_days;
    let so_days = engine.config().so_days;

    let open_close = ChartRequest::new(
        format!("{ticker}_open_close.png"),
        format!("Daily opening and closing prices for {ticker}"),
        &x_label,
        usd,
    )
    .with(ChartSeries::new(
        "opening price (USD)",
        SeriesStyle::Solid,
        "black",
        0,
        prices.open().to_vec(),
    ))
    .with(ChartSeries::new(
        "closing price (USD)",
        SeriesStyle::Dashed,
        "blue",
        0,
        prices.close().to_vec(),
    ));

    let high_low = ChartRequest::new(
        format!("{ticker}_high_low.png"),
        format!("Daily high and low prices for {ticker}"),
        &x_label,
        usd,
    )
    .with(ChartSeries::new(
        "highest price (USD)",
        SeriesStyle::Dotted,
        "green",
        0,
        prices.high().to_vec(),
    ))
    .with(ChartSeries::new(
        "lowest price (USD)",
        SeriesStyle::DashDot,
        "red",
        0,
        prices.low().to_vec(),
    ));

    let volume_chart = ChartRequest::new(
        format!("{ticker}_volume.png"),
        format!("Daily trading volume for {ticker}"),
        &x_label,
        "Number of trades (millions)",
    )
    .with(ChartSeries::new(
        "number of trades",
        SeriesStyle::DashDot,
        "magenta",
        0,
        volume.clone(),
    ));

    let mut comprehensive = ChartRequest::new(
        format!("{ticker}_comprehensive.png"),
        format!("Stock chart with {ma_days} day moving averages for {ticker}"),
        &x_label,
        usd,
    )
    .with(ChartSeries::new(
        "closing price (USD)",
        SeriesStyle::Solid,
        "blue",
        0,
        prices.close().to_vec(),
    ))
    .with_report_series(report, &engine.sma_name(), "SMA", SeriesStyle::DashDot, "yellow")
    .with_report_series(report, &engine.ema_name(), "EMA", SeriesStyle::DashDot, "magenta")
    .with(ChartSeries::new("volume", SeriesStyle::Bar, "black", 0, volume).on_secondary());
    comprehensive.secondary_y_label = Some("Number of trades (millions)".to_string());

    let stochastic = ChartRequest::new(
        format!("{ticker}_stochastic.png"),
        format!("{so_days} day stochastic oscillator for {ticker}"),
        &x_label,
        "Percent of range",
    )
    .with_report_series(
        report,
        &engine.percent_k_name(),
        "%K",
        SeriesStyle::Solid,
        "blue",
    )
    .with_report_series(
        report,
        &engine.percent_d_name(),
        "%D",
        SeriesStyle::Dashed,
        "red",
    );

    let macd = ChartRequest::new(
        format!("{ticker}_macd.png"),
        format!("MACD (12, 26, 9) for {ticker}"),
        &x_label,
        usd,
    )
    .with_report_series(report, "macd", "MACD", SeriesStyle::Solid, "black")
    .with_report_series(report, "macd_signal", "signal", SeriesStyle::Dashed, "red");

    vec![
        open_close,
        high_low,
        volume_chart,
        comprehensive,
        stochastic,
        macd,
    ]
}
