//! Price tables and the correlation matrix of their returns.

use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};

use crate::error::{Result, TreeError};
use crate::tree::CorrelationMatrix;

/// Daily closing prices, one column per ticker. `None` marks a missing price.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceTable {
	tickers: Vec<String>,
	dates: Vec<String>,
	rows: Vec<Vec<Option<f64>>>,
}

/// Complete percentage-change rows, one column per ticker.
#[derive(Clone, Debug, PartialEq)]
pub struct Returns {
	pub tickers: Vec<String>,
	pub dates: Vec<String>,
	pub rows: Vec<Vec<f64>>,
}

impl PriceTable {
	/// Parses `Date,<ticker>...` CSV text.
	pub fn from_csv(text: &str) -> Result<Self> {
		let mut reader = ReaderBuilder::new()
			.trim(Trim::All)
			.flexible(true)
			.from_reader(text.as_bytes());

		let header = reader.headers()?.clone();
		if header.len() < 2 {
			return Err(TreeError::invalid_input(
				"price table needs a date column and at least one ticker",
			));
		}
		let tickers: Vec<String> = header.iter().skip(1).map(str::to_owned).collect();

		let mut dates = Vec::new();
		let mut rows = Vec::new();
		for (line, record) in reader.records().enumerate() {
			let record = record?;
			if record.len() != header.len() {
				return Err(TreeError::invalid_input(format!(
					"row {} has {} fields, expected {}",
					line + 1,
					record.len(),
					header.len()
				)));
			}
			dates.push(record[0].to_owned());
			rows.push(parse_prices(&record, &tickers, line + 1)?);
		}
		debug!("loaded {} price rows for {} tickers", rows.len(), tickers.len());

		Ok(Self {
			tickers,
			dates,
			rows,
		})
	}

	pub fn tickers(&self) -> &[String] {
		&self.tickers
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// `p[t] / p[t-1] - 1` per ticker, with missing prices carried forward
	/// from the last known one. A gap therefore yields a zero return on the
	/// missing day and spans the gap on the next. The first row, and rows
	/// where some ticker has no earlier price to carry, are dropped.
	pub fn returns(&self) -> Returns {
		let mut last: Vec<Option<f64>> = vec![None; self.tickers.len()];
		let mut dates = Vec::new();
		let mut rows = Vec::new();
		for (t, prices) in self.rows.iter().enumerate() {
			let filled: Vec<Option<f64>> =
				prices.iter().zip(&last).map(|(cur, prev)| cur.or(*prev)).collect();
			if t > 0 {
				let row: Option<Vec<f64>> = last
					.iter()
					.zip(&filled)
					.map(|(prev, cur)| match (prev, cur) {
						(Some(p), Some(c)) if *p != 0.0 => Some(c / p - 1.0),
						_ => None,
					})
					.collect();
				if let Some(row) = row {
					dates.push(self.dates[t].clone());
					rows.push(row);
				}
			}
			last = filled;
		}
		let dropped = self.rows.len().saturating_sub(1) - rows.len();
		if dropped > 0 {
			warn!("dropped {dropped} return rows without a prior price");
		}
		Returns {
			tickers: self.tickers.clone(),
			dates,
			rows,
		}
	}

	/// Pearson correlation matrix of [`returns`](Self::returns).
	pub fn correlation(&self) -> Result<CorrelationMatrix> {
		self.returns().correlation()
	}
}

fn parse_prices(record: &StringRecord, tickers: &[String], line: usize) -> Result<Vec<Option<f64>>> {
	record
		.iter()
		.skip(1)
		.zip(tickers)
		.map(|(cell, ticker)| {
			if cell.is_empty() {
				return Ok(None);
			}
			cell.parse::<f64>().map(Some).map_err(|_| {
				TreeError::invalid_input(format!("row {line}, {ticker}: `{cell}` is not a number"))
			})
		})
		.collect()
}

impl Returns {
	/// Pearson correlation between every pair of columns.
	///
	/// A column whose returns never vary has no defined correlation with
	/// anything, so its ticker is left out of the matrix and never reaches the
	/// graph.
	pub fn correlation(&self) -> Result<CorrelationMatrix> {
		let t = self.rows.len();
		if t < 2 {
			return Err(TreeError::invalid_input(format!(
				"need at least 2 complete return rows, got {t}"
			)));
		}

		let means: Vec<f64> = (0..self.tickers.len())
			.map(|j| self.rows.iter().map(|r| r[j]).sum::<f64>() / t as f64)
			.collect();
		let centered: Vec<Vec<f64>> = self
			.rows
			.iter()
			.map(|r| r.iter().zip(&means).map(|(x, m)| x - m).collect())
			.collect();
		let norms: Vec<f64> = (0..self.tickers.len())
			.map(|j| centered.iter().map(|r| r[j] * r[j]).sum::<f64>().sqrt())
			.collect();

		let (kept, flat): (Vec<usize>, Vec<usize>) =
			(0..self.tickers.len()).partition(|&j| norms[j] > f64::EPSILON);
		for &j in &flat {
			warn!("{} has constant returns, left out of the correlation matrix", self.tickers[j]);
		}
		if kept.is_empty() {
			return Err(TreeError::invalid_input("every ticker has constant returns"));
		}

		let n = kept.len();
		let mut values = vec![0.0; n * n];
		for (a, &i) in kept.iter().enumerate() {
			values[a * n + a] = 1.0;
			for (b, &j) in kept.iter().enumerate().skip(a + 1) {
				let cov: f64 = centered.iter().map(|row| row[i] * row[j]).sum();
				let r = (cov / (norms[i] * norms[j])).clamp(-1.0, 1.0);
				values[a * n + b] = r;
				values[b * n + a] = r;
			}
		}
		let labels = kept.iter().map(|&j| self.tickers[j].clone()).collect();
		CorrelationMatrix::new(labels, values)
	}
}
