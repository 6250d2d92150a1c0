use xwave::{
    error::XwResult,
    gsm::{GsmSourceSynthesizer, SynthesizerConfig},
};

fn main() -> XwResult<()> {
    let mut config = SynthesizerConfig::default();
    let mut synthesizer = GsmSourceSynthesizer::new();
    let first = synthesizer.reset_mode_index(&mut config)?;
    let selection = &first.selection;
    println!(
        "{} x {} modes retained ({} total)",
        selection.mode_count_h,
        selection.mode_count_v,
        selection.total_modes()
    );
    if let Some((h, v)) = selection.coherence {
        println!(
            "coherent fraction H: {:.4}, V: {:.4}",
            h.coherence_fraction, v.coherence_fraction
        );
    }
    for _ in 0..5 {
        let result = synthesizer.increase_mode_index(&mut config)?;
        let (ih, iv) = result.selection.mode_pair;
        println!(
            "mode {:3} = ({ih}, {iv}), cumulated occupation {:.4}",
            result.selection.mode_index,
            result.selection.cumulated_occupation[result.selection.mode_index]
        );
    }
    Ok(())
}
