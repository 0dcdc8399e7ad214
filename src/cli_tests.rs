use super::*;
use crate::common::{DftError, Sign};
use crate::config::ENV_SIGN;
use crate::fixed::types::FixedFormat;
use std::fs;
use std::path::Path;

fn os(args: &[&str]) -> Vec<OsString> {
    args.iter().map(OsString::from).collect()
}

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("dft-pipeline-{}-{}", std::process::id(), name))
}

#[test]
fn test_filter_known_flags() {
    let args = os(&["idft_gen", "--N=16", "--verbose", "stray", "--name", "top", "--x=1"]);
    assert_eq!(
        filter_known_flags(args, &["--N", "--name"]),
        os(&["idft_gen", "--N=16", "--name", "top"])
    );

    assert_eq!(filter_known_flags(Vec::<OsString>::new(), &["--N"]), Vec::<OsString>::new());
    assert_eq!(
        filter_known_flags(os(&["gen", "--N", "--name=a"]), &["--N", "--name"]),
        os(&["gen", "--N", "--name=a"])
    );
}

#[test]
fn test_gen_args() {
    let args = GenArgs::parse_from(filter_known_flags(
        os(&["idft_gen", "--N=8", "--unknown=3", "--name=dft8"]),
        &["--N", "--name"],
    ));
    assert_eq!(
        args,
        GenArgs {
            n: Some(8),
            name: Some("dft8".to_string()),
        }
    );

    let args = GenArgs::parse_from(os(&["idft_gen"]));
    assert_eq!(args, GenArgs { n: None, name: None });
}

#[test]
fn test_ref_args() {
    let args = RefArgs::parse_from(filter_known_flags(
        os(&["dft_recurse", "--src=in.csv", "-q", "--dst", "out.csv"]),
        &["--src", "--dst"],
    ));
    assert_eq!(args.src, PathBuf::from("in.csv"));
    assert_eq!(args.dst, PathBuf::from("out.csv"));
    assert!(RefArgs::try_parse_from(os(&["dft_recurse", "--src=in.csv"])).is_err());
}

#[test]
fn test_generator_config_layers() {
    let none: [(&str, &str); 0] = [];
    let config = generator_config_from(&GenArgs { n: None, name: None }, none).unwrap();
    assert_eq!(config, GeneratorConfig::default());

    // The size alone also picks the default name for that size
    let config = generator_config_from(&GenArgs { n: Some(64), name: None }, none).unwrap();
    assert_eq!(config.n, 64);
    assert_eq!(config.name, "idft_comp_N64");

    let config = generator_config_from(
        &GenArgs {
            n: Some(16),
            name: Some("fft16".to_string()),
        },
        [("DFTGEN_WIDTH", "18"), ("DFTGEN_FRAC", "10"), (ENV_SIGN, "-1")],
    )
    .unwrap();
    assert_eq!(config.name, "fft16");
    assert_eq!(config.format, FixedFormat::new(18, 10).unwrap());
    assert_eq!(config.sign, Sign::Negative);
}

#[test]
fn test_generator_config_errors() {
    let none: [(&str, &str); 0] = [];
    let err = generator_config_from(&GenArgs { n: Some(12), name: None }, none).unwrap_err();
    assert_eq!(err.downcast_ref::<DftError>(), Some(&DftError::NotPowerOfTwo(12)));

    let err = generator_config_from(&GenArgs { n: None, name: None }, [("DFTGEN_WIDTH", "64")])
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<DftError>(),
        Some(&DftError::InvalidFormat { width: 64, frac: 8 })
    );
}

#[test]
fn test_env_file_layer() {
    let path = scratch("settings.env");
    fs::write(&path, "# generator settings\nDFTGEN_WIDTH=16\nDFTGEN_FRAC=6\nDFTGEN_SIGN=-1\n").unwrap();

    let mut vars = env_file_vars(&path).unwrap();
    assert_eq!(vars.len(), 3);
    assert_eq!(vars[0], ("DFTGEN_WIDTH".to_string(), "16".to_string()));

    // A process variable listed after the file wins
    vars.push(("DFTGEN_FRAC".to_string(), "4".to_string()));
    let config = generator_config_from(&GenArgs { n: Some(8), name: None }, vars).unwrap();
    assert_eq!(config.format, FixedFormat::new(16, 4).unwrap());
    assert_eq!(config.sign, Sign::Negative);
    fs::remove_file(&path).ok();

    assert!(env_file_vars(scratch("no-such.env")).unwrap().is_empty());
}

#[test]
fn test_run_generator() {
    let mut out = Vec::new();
    let graph = run_generator(&GeneratorConfig::new(8, "idft_comp_N8"), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(graph.latency(), 3);
    assert!(text.contains("module idft_comp_N8  /* N (number of samples) = 8 */"));
    assert_eq!(text, pipeline::render(&graph).unwrap());
}

fn write_input(path: &Path) {
    fs::write(path, "1.0\n1.0\n1.0\n1.0\n").unwrap();
}

#[test]
fn test_run_reference_float() {
    let src = scratch("float-in.csv");
    write_input(&src);

    for reference in [
        Reference::BruteForce,
        Reference::BruteForceTable,
        Reference::Recurse,
        Reference::Library,
    ] {
        let dst = scratch(&format!("{}.csv", reference.bin_name()));
        let args = RefArgs { src: src.clone(), dst: dst.clone() };
        assert_eq!(run_reference(&args, reference).unwrap(), 4);

        let text = fs::read_to_string(&dst).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4, "{}", reference.bin_name());
        assert_eq!(lines[0], "4.000000, 0.000000");
        let rest = vector_io::read_values(text.as_bytes()).unwrap();
        assert!(rest[1..].iter().all(|v| v.norm() < 1e-9));
        fs::remove_file(&dst).ok();
    }
    fs::remove_file(&src).ok();
}

#[test]
fn test_run_reference_fixed() {
    let src = scratch("fixed-in.csv");
    write_input(&src);

    for reference in [Reference::FixedBruteForce, Reference::FixedRecurse] {
        let dst = scratch(&format!("{}.csv", reference.bin_name()));
        let args = RefArgs { src: src.clone(), dst: dst.clone() };
        run_reference(&args, reference).unwrap();

        let text = fs::read_to_string(&dst).unwrap();
        assert_eq!(
            text.lines().next(),
            Some("0x00000400, 0x00000000,  4.000000, 0.000000")
        );
        assert_eq!(text.lines().count(), 4);
        fs::remove_file(&dst).ok();
    }
    fs::remove_file(&src).ok();
}

#[test]
fn test_run_reference_errors() {
    let args = RefArgs {
        src: scratch("missing.csv"),
        dst: scratch("unused.csv"),
    };
    let err = run_reference(&args, Reference::Recurse).unwrap_err();
    assert!(err.to_string().starts_with("Unable to open input file"));

    let src = scratch("three.csv");
    fs::write(&src, "1\n2\n3\n").unwrap();
    let args = RefArgs { src: src.clone(), dst: scratch("three-out.csv") };
    let err = run_reference(&args, Reference::Recurse).unwrap_err();
    assert_eq!(err.downcast_ref::<DftError>(), Some(&DftError::NotPowerOfTwo(3)));
    fs::remove_file(&src).ok();
}
