//! Parallel decoding of pre-split records
//!
//! A section body held in memory is split at every code 0 token. Each slice
//! is an independent record, so slices are decoded on `rayon` workers; every
//! worker fills its own [`ChainSet`] and the sets are merged in input order.

use rayon::prelude::*;

use super::decoder::{DecoderConfiguration, RecordDecoder};
use crate::chain::ChainSet;
use crate::error::Result;
use crate::io::dxf::{SliceTokens, Token};
use crate::notification::{NotificationCollection, NotificationType};
use crate::policy::RECORD_START_CODE;
use crate::schema::SchemaRegistry;
use crate::types::DxfVersion;

/// One record of a split token run
#[derive(Debug, Clone, Copy)]
pub struct RecordSlice<'a> {
    /// The record's `0 TYPE` token
    pub start: &'a Token,
    /// Tokens after the start token, up to the next code 0
    pub body: &'a [Token],
}

impl<'a> RecordSlice<'a> {
    pub fn entity_type(&self) -> &'a str {
        &self.start.value
    }
}

/// Split a token run at every code 0 token.
///
/// Tokens before the first code 0 belong to no record and are dropped.
pub fn split_records(tokens: &[Token]) -> Vec<RecordSlice<'_>> {
    let starts: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.code == RECORD_START_CODE)
        .map(|(i, _)| i)
        .collect();

    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(tokens.len());
            RecordSlice {
                start: &tokens[start],
                body: &tokens[start + 1..end],
            }
        })
        .collect()
}

/// Records and diagnostics of a parallel decode
#[derive(Debug, Clone, Default)]
pub struct ParallelDecoded {
    pub chains: ChainSet,
    pub notifications: NotificationCollection,
}

impl ParallelDecoded {
    fn merge(mut self, other: ParallelDecoded) -> Result<ParallelDecoded> {
        self.chains.merge(other.chains)?;
        self.notifications.extend(other.notifications);
        Ok(self)
    }
}

/// Decode every record of `tokens` in parallel.
///
/// Records of types the registry does not know are skipped with a
/// `NotImplemented` notification. Chain order and notification order follow
/// the input.
pub fn decode_parallel(
    tokens: &[Token],
    registry: &SchemaRegistry,
    version: DxfVersion,
    config: &DecoderConfiguration,
) -> Result<ParallelDecoded> {
    let records = split_records(tokens);
    tracing::debug!(records = records.len(), "decoding records in parallel");

    records
        .par_iter()
        .try_fold(ParallelDecoded::default, |mut acc, slice| {
            let schema = match registry.get(slice.entity_type()) {
                Some(schema) => schema,
                None => {
                    acc.notifications.notify_at(
                        NotificationType::NotImplemented,
                        slice.start.line,
                        RECORD_START_CODE,
                        format!("no schema for {}, record skipped", slice.entity_type()),
                    );
                    return Ok(acc);
                }
            };
            let mut source = SliceTokens::new(slice.body).terminated();
            let decoded = RecordDecoder::new(schema, version)
                .with_configuration(config.clone())
                .decode(&mut source)?;
            acc.chains.append(decoded.record)?;
            acc.notifications.extend(decoded.notifications);
            Ok(acc)
        })
        .try_reduce(ParallelDecoded::default, ParallelDecoded::merge)
}
