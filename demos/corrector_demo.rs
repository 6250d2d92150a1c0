use xwave::{
    corrector::{Apodization, RefractiveCorrector},
    electronvolt,
    error::XwResult,
    materials::{Material, ScatteringFactorDatabase},
    meter, millimeter,
    wavefront::{Wavefront, Wavefront1D},
};

fn main() -> XwResult<()> {
    let input = Wavefront1D::from_range(
        millimeter!(-1.47),
        millimeter!(1.47),
        1000,
        electronvolt!(1000.0),
    )?;
    let optics = Material::Be.resolve(input.photon_energy(), &ScatteringFactorDatabase::new())?;
    for apodization in [
        Apodization::None,
        Apodization::IntensityWeighted,
        Apodization::GaussianWindowed { ratio: 0.1 },
    ] {
        let corrector = RefractiveCorrector::new(meter!(10.0), apodization, millimeter!(0.01))?;
        let result = corrector.solve(&input, &optics, None)?;
        let heights = result.profile.heights();
        println!(
            "{apodization}: height at edge {:.4e} m, at center {:.4e} m, edge transmission {:.4}",
            heights[0],
            heights[heights.len() / 2],
            result.output_wavefront.intensity()[0]
        );
    }
    Ok(())
}
