// Inference collaborator — trait-based abstraction for hosted models.
//
// The LanguageModel trait defines the interface. HfClient implements it
// against the Hugging Face Inference API; tests script their own
// implementations. Swapping providers never touches the run loop.

pub mod huggingface;
pub mod params;
pub mod traits;
