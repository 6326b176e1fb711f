// Term input handling — shape classification and normalization.
//
// Topic-model packages hand their top terms around in several shapes
// (per-topic lists, term matrices, token/probability records, STM labeled
// matrices). The shape is resolved once into a TermInput variant at entry;
// normalize() turns any variant into one ordered list of term lists.

pub mod input;
pub mod normalize;
