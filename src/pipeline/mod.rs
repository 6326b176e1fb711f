// The labeling pipeline: request loop, soft-failure handling, aggregation.
//
// Topics are processed strictly one at a time, in input order. This module
// is the only place allowed to sleep or to block on the operator; the
// components it drives (normalizer, prompt builder, extractor) are pure.

pub mod detect;
pub mod labeler;
pub mod policy;
