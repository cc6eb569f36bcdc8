use anyhow::{anyhow, Result};
use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::mistral::{Config as MistralConfig, Model as Mistral};
use tokenizers::Tokenizer;
use tracing::info;

use std::{fs, path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

use super::GenerationParams;

// ---------------------------------------------------------
// Artifact resolution via the hf-hub cache
// ---------------------------------------------------------
struct Artifacts {
    tokenizer: PathBuf,
    config: PathBuf,
    weights: Vec<PathBuf>,
}

fn fetch_artifacts(model_id: &str) -> Result<Artifacts> {
    use hf_hub::api::sync::Api;

    let repo = Api::new()?.model(model_id.to_string());
    let tokenizer = repo.get("tokenizer.json")?;
    let config = repo.get("config.json")?;

    // Sharded checkpoints carry an index file; single-file ones don't.
    let weights = match repo.get("model.safetensors.index.json") {
        Ok(index_path) => {
            let index: serde_json::Value = serde_json::from_slice(&fs::read(&index_path)?)?;
            let weight_map = index["weight_map"]
                .as_object()
                .ok_or_else(|| anyhow!("malformed safetensors index for {model_id}"))?;

            let mut shard_names: Vec<String> = weight_map
                .values()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
            shard_names.sort();
            shard_names.dedup();

            shard_names
                .into_iter()
                .map(|name| repo.get(&name).map_err(Into::into))
                .collect::<Result<Vec<_>>>()?
        }
        Err(_) => vec![repo.get("model.safetensors")?],
    };

    Ok(Artifacts {
        tokenizer,
        config,
        weights,
    })
}

// ---------------------------------------------------------
// PUBLIC SERVICE
// ---------------------------------------------------------
pub struct MistralService {
    model: Arc<Mutex<Mistral>>,
    tokenizer: Arc<Tokenizer>,
    device: Device,
    eos: u32,
}

impl MistralService {
    /// Downloads (or reuses cached) model artifacts and loads the
    /// weights. Expensive; callers keep the result in a once-cell.
    pub async fn load(model_id: &str) -> Result<Self> {
        let id = model_id.to_string();
        let artifacts = tokio::task::spawn_blocking(move || fetch_artifacts(&id)).await??;

        let device = Device::cuda_if_available(0)?;
        let dtype = if device.is_cuda() {
            DType::F16
        } else {
            DType::F32
        };
        info!(model = model_id, ?device, "loading weights");

        let tokenizer = Arc::new(
            Tokenizer::from_file(&artifacts.tokenizer)
                .map_err(|e| anyhow!("tokenizer error: {e}"))?,
        );
        let eos = tokenizer
            .token_to_id("</s>")
            .or_else(|| tokenizer.token_to_id("<|endoftext|>"))
            .unwrap_or(u32::MAX);

        let cfg: MistralConfig = serde_json::from_slice(&fs::read(&artifacts.config)?)?;

        // ---- mmap the checkpoint shards ----
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&artifacts.weights, dtype, &device)?
        };
        let model = Mistral::new(&cfg, vb)?;

        info!(
            model = model_id,
            shards = artifacts.weights.len(),
            "model ready"
        );

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
            tokenizer,
            device,
            eos,
        })
    }

    /// Sampled completion. Returns prompt + continuation, the same echo
    /// shape a text-generation pipeline produces; the caller strips the
    /// prompt back off.
    pub async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let enc = self
            .tokenizer
            .encode(prompt, true)
            .map_err(|e| anyhow!("tokenizer encode error: {e}"))?;
        let mut tokens = enc.get_ids().to_vec();

        let mut lp = LogitsProcessor::new(seed(), Some(params.temperature), None);
        let mut output = String::new();
        let mut pos = 0usize;

        // The kv cache is mutable model state, so the whole pass runs
        // under the model lock. One generation at a time.
        let mut model = self.model.lock().await;
        model.clear_kv_cache();

        for _ in 0..params.max_length {
            let ctx: &[u32] = if pos == 0 {
                &tokens
            } else {
                std::slice::from_ref(tokens.last().unwrap())
            };

            let input = Tensor::new(ctx, &self.device)?.unsqueeze(0)?;
            let logits = {
                let out = model.forward(&input, pos)?;
                let seq_len = out.dim(1)?;
                out.i((0, seq_len - 1))?.to_dtype(DType::F32)?
            };
            pos += ctx.len();

            let next_id = lp.sample(&logits)?;
            tokens.push(next_id);

            if next_id == self.eos {
                break;
            }

            if let Ok(piece) = self.tokenizer.decode(&[next_id], false) {
                if !piece.is_empty() {
                    output.push_str(&piece.replace('\u{2581}', " "));
                }
            }

            tokio::task::yield_now().await;
        }

        Ok(format!("{prompt}{output}"))
    }
}

// ---------------------------------------------------------
// Helpers
// ---------------------------------------------------------
fn seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}
