use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{Axis, SimulationParameters},
    error::RecordError,
};

/// Body of `POST /api/simulator`: `{"data": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub data: SimulationQuery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationQuery {
    pub s: String,
    pub p: String,
    pub d: String,
    pub f: String,
    pub range_start: u64,
    pub range_end: u64,
}

impl SimulationRequest {
    pub fn new(params: &SimulationParameters, range_start: u64, range_end: u64) -> Self {
        Self {
            data: SimulationQuery {
                s: params.s.clone(),
                p: params.p.clone(),
                d: params.d.clone(),
                f: params.f.clone(),
                range_start,
                range_end,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub s: u64,
    pub p: u64,
    pub d: u64,
    pub f: u64,
    /// Total size of the combination set as computed by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_combs: Option<u64>,
    /// Older services report the full set length under this name instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_len: Option<u64>,
    pub range_start: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_end: Option<u64>,
    pub rows: Vec<RowRecord>,
    #[serde(default)]
    pub terms: Vec<TermRecord>,
}

impl SimulationResponse {
    pub fn axis_count(&self, axis: Axis) -> u64 {
        match axis {
            Axis::S => self.s,
            Axis::P => self.p,
            Axis::D => self.d,
            Axis::F => self.f,
        }
    }

    /// Server-supplied total when present, otherwise the product of the per-axis counts.
    pub fn total_combinations(&self) -> u64 {
        self.total_combs.or(self.rows_len).unwrap_or_else(|| {
            Axis::ALL
                .iter()
                .fold(1u64, |acc, axis| acc.saturating_mul(self.axis_count(*axis)))
        })
    }
}

/// One configuration row: arrow cells followed by its ml/ms values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowRecord(pub Vec<Value>);

impl RowRecord {
    pub fn fields(&self) -> &[Value] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubTerm {
    pub base: Value,
    pub symbol: Value,
    pub exponent: f64,
}

/// Grouped-summary row: leading scalar fields plus its symbolic sub-terms.
///
/// Decodes from either the flat layout `[l, s, count, sup, letter, [exp, ...]]`, where every
/// exponent shares `sup` and `letter`, or a layout whose trailing field already holds
/// `[base, symbol, exp]` triples. An empty trailing list is read as the flat layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Value>", into = "Vec<Value>")]
pub struct TermRecord {
    pub scalars: Vec<Value>,
    pub sub_terms: Vec<SubTerm>,
}

impl TryFrom<Vec<Value>> for TermRecord {
    type Error = RecordError;

    fn try_from(mut fields: Vec<Value>) -> Result<Self, Self::Error> {
        let trailing = fields.pop().ok_or(RecordError::EmptyTerm)?;
        let Value::Array(entries) = trailing else {
            return Err(RecordError::MissingSubTerms {
                found: trailing.to_string(),
            });
        };

        let pre_expanded = !entries.is_empty() && entries.iter().all(Value::is_array);
        if pre_expanded {
            let sub_terms = entries
                .into_iter()
                .enumerate()
                .map(|(index, entry)| sub_term_from_triple(index, entry))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Self {
                scalars: fields,
                sub_terms,
            });
        }

        if fields.len() < 2 {
            return Err(RecordError::MissingBaseOrSymbol {
                fields: fields.len(),
            });
        }
        let symbol = fields.pop().unwrap_or(Value::Null);
        let base = fields.pop().unwrap_or(Value::Null);
        let sub_terms = entries
            .into_iter()
            .enumerate()
            .map(|(index, exponent)| {
                Ok(SubTerm {
                    base: base.clone(),
                    symbol: symbol.clone(),
                    exponent: exponent_value(index, &exponent)?,
                })
            })
            .collect::<Result<Vec<_>, RecordError>>()?;

        Ok(Self {
            scalars: fields,
            sub_terms,
        })
    }
}

impl From<TermRecord> for Vec<Value> {
    fn from(record: TermRecord) -> Self {
        let triples = record
            .sub_terms
            .into_iter()
            .map(|sub| Value::Array(vec![sub.base, sub.symbol, Value::from(sub.exponent)]))
            .collect();
        let mut fields = record.scalars;
        fields.push(Value::Array(triples));
        fields
    }
}

fn sub_term_from_triple(index: usize, entry: Value) -> Result<SubTerm, RecordError> {
    let Value::Array(parts) = entry else {
        return Err(RecordError::InvalidTriple { index });
    };
    let [base, symbol, exponent]: [Value; 3] = parts
        .try_into()
        .map_err(|_| RecordError::InvalidTriple { index })?;
    Ok(SubTerm {
        exponent: exponent_value(index, &exponent)?,
        base,
        symbol,
    })
}

fn exponent_value(index: usize, value: &Value) -> Result<f64, RecordError> {
    value.as_f64().ok_or_else(|| RecordError::InvalidExponent {
        index,
        found: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn request_wraps_query_in_data_envelope() {
        let params = SimulationParameters::new("1", "2", "", "x");
        let body = serde_json::to_value(SimulationRequest::new(&params, 0, 2000)).expect("encode");
        assert_eq!(
            body,
            json!({"data": {"s": "1", "p": "2", "d": "", "f": "x", "range_start": 0, "range_end": 2000}})
        );
    }

    #[test]
    fn decodes_flat_term_record() {
        let record: TermRecord =
            serde_json::from_value(json!([2, 0.5, 1, 2, "D", [2.5, 1.5]])).expect("decode");
        assert_eq!(record.scalars, vec![json!(2), json!(0.5), json!(1)]);
        assert_eq!(record.sub_terms.len(), 2);
        assert_eq!(record.sub_terms[0].base, json!(2));
        assert_eq!(record.sub_terms[0].symbol, json!("D"));
        assert_eq!(record.sub_terms[1].exponent, 1.5);
    }

    #[test]
    fn decodes_pre_expanded_term_record() {
        let record: TermRecord =
            serde_json::from_value(json!([0, 0, 1, [[1, "S", 0], [3, "P", 2]]])).expect("decode");
        assert_eq!(record.scalars.len(), 3);
        assert_eq!(record.sub_terms[1].symbol, json!("P"));
        assert_eq!(record.sub_terms[1].exponent, 2.0);
    }

    #[test]
    fn flat_term_record_with_no_exponents_keeps_scalars() {
        let record: TermRecord =
            serde_json::from_value(json!([0, 0, 1, 1, "S", []])).expect("decode");
        assert_eq!(record.scalars.len(), 3);
        assert!(record.sub_terms.is_empty());
    }

    #[test]
    fn rejects_term_record_without_sub_term_list() {
        let err = TermRecord::try_from(vec![json!(1), json!("S"), json!(0)]).expect_err("reject");
        assert!(matches!(err, RecordError::MissingSubTerms { .. }));
    }

    #[test]
    fn rejects_non_numeric_exponent() {
        let err = TermRecord::try_from(vec![json!(1), json!("S"), json!(["a"])]).expect_err("reject");
        assert_eq!(
            err,
            RecordError::InvalidExponent {
                index: 0,
                found: "\"a\"".to_string()
            }
        );
    }

    #[test]
    fn total_prefers_server_value_then_falls_back_to_product() {
        let mut response = SimulationResponse {
            s: 2,
            p: 15,
            d: 1,
            f: 1,
            total_combs: Some(7),
            rows_len: Some(9),
            range_start: 0,
            range_end: None,
            rows: Vec::new(),
            terms: Vec::new(),
        };
        assert_eq!(response.total_combinations(), 7);
        response.total_combs = None;
        assert_eq!(response.total_combinations(), 9);
        response.rows_len = None;
        assert_eq!(response.total_combinations(), 30);
    }
}
