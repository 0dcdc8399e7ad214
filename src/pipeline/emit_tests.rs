use super::*;
use crate::common::Sign;
use crate::config::GeneratorConfig;
use crate::fixed::types::FixedFormat;

fn text(n: usize, name: &str) -> String {
    let graph = PipelineGraph::build(&GeneratorConfig::new(n, name)).unwrap();
    render(&graph).unwrap()
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn test_deterministic() {
    for n in [2, 4, 8, 32] {
        assert_eq!(text(n, "idft"), text(n, "idft"), "N={}", n);
    }

    // Writing straight to a sink gives the same bytes as render
    let graph = PipelineGraph::build(&GeneratorConfig::new(16, "idft")).unwrap();
    let mut sink = Vec::new();
    emit(&graph, &mut sink).unwrap();
    assert_eq!(sink, render(&graph).unwrap().into_bytes());
}

#[test]
fn test_module_order() {
    let out = text(16, "idft");
    let positions: Vec<usize> = [
        "module idft_blend_math",
        "module idft_twiddle_n16",
        "module idft_twiddle_n8",
        "module idft_twiddle_n4",
        "module idft  /* N (number of samples) = 16 */",
    ]
    .iter()
    .map(|m| out.find(m).unwrap_or_else(|| panic!("missing '{}'", m)))
    .collect();

    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{:?}", positions);
    assert!(out.starts_with("/*\n * This code generated by idft_gen. Do not edit.\n"));
    assert!(out.ends_with("endmodule\n"));
}

#[test]
fn test_structure() {
    for k in 1..=6u32 {
        let n = 1usize << k;
        let out = text(n, "top");

        assert_eq!(count(&out, "\nmodule "), 1 + (k as usize - 1) + 1, "N={}", n);
        assert_eq!(count(&out, "module top_twiddle_n"), k as usize - 1);
        assert_eq!(count(&out, "endmodule"), k as usize + 1);
        assert_eq!(count(&out, "(leaf)"), n / 2);
        assert_eq!(count(&out, "(blend)"), n / 2 - 1);
        assert_eq!(count(&out, "_math\n      (.clk(clk), .reset(reset),"), n / 2 - 1);
    }
}

#[test]
fn test_port_contract() {
    let out = text(32, "idft_comp_N32");
    for line in [
        "   (input  wire clk,",
        "    input  wire reset,",
        "    output wire ready,",
        "    output wire signed [WIDTH-1:0] dft_real, dft_imag,",
        "    input  wire [4:0] dft_idx,",
        "    input  wire signed [31:0][WIDTH-1:0] src_real, src_imag",
        "  #(parameter WIDTH = 24,",
        "    parameter FRAC  = 8",
    ] {
        assert!(out.contains(line), "missing port line '{}'", line);
    }

    let two = text(2, "pair");
    assert!(two.contains("    input  wire [0:0] dft_idx,"));
    assert!(two.contains("    input  wire signed [1:0][WIDTH-1:0] src_real, src_imag"));
    assert!(!two.contains("_twiddle_n"));
    assert!(two.contains("    assign dft_real = p_n2_s0_real;"));
}

#[test]
fn test_root_drives_outputs() {
    let out = text(8, "idft");
    assert!(out.contains("    assign dft_real = p_n8_s0_real;\n"));
    assert!(out.contains("    assign dft_imag = p_n8_s0_imag;\n"));
    assert!(out.contains("    assign ready    = p_n8_s0_ready;\n"));
}

#[test]
fn test_leaf_and_blend_wiring() {
    let out = text(8, "idft");

    assert!(out.contains("    // p_n2_s1 == src[1] +/- src[5] (leaf)\n"));
    assert!(out.contains(
        "    wire signed [WIDTH-1:0] p_n2_s1_real = $signed(src_real[1])\n        + (dft_idx[0] ? -$signed(src_real[5]) : $signed(src_real[5]));\n"
    ));
    assert!(out.contains("    // p_n4_s1 == p_n2_s1 + W4^idx * p_n2_s3 (blend)\n"));
    assert!(out.contains("       .in_ready(p_n2_s1_ready & p_n2_s3_ready), .out_ready(p_n4_s1_ready),\n"));
    assert!(out.contains("       .w_real(w_n4_real), .w_imag(w_n4_imag),\n"));
    assert!(out.contains("      (.clk(clk), .idx(dft_idx[2:0]), .w_real(w_n8_real), .w_imag(w_n8_imag));\n"));
    assert!(out.contains("      (.clk(clk), .idx(dft_idx[1:0]), .w_real(w_n4_real), .w_imag(w_n4_imag));\n"));

    // One twiddle instance per size, shared by every blend of that size
    assert_eq!(count(&out, "idft_twiddle_n4 #(.WIDTH(WIDTH)) w_n4\n"), 1);
    assert_eq!(count(&out, ".w_real(w_n4_real)"), 3);
}

#[test]
fn test_twiddle_constants() {
    let out = text(8, "idft");
    assert!(out.contains("        3'd0: begin w_real <= 256; w_imag <= 0; end"));
    assert!(out.contains("        3'd1: begin w_real <= 181; w_imag <= 181; end"));
    assert!(out.contains("        3'd2: begin w_real <= 0; w_imag <= 256; end"));
    assert!(out.contains("        3'd5: begin w_real <= -181; w_imag <= -181; end"));
    assert!(out.contains("        2'd3: begin w_real <= 0; w_imag <= -256; end"));
}

#[test]
fn test_format_and_sign_reach_the_text() {
    let config = GeneratorConfig::new(4, "idft")
        .with_format(FixedFormat::new(16, 12).unwrap())
        .with_sign(Sign::Negative);
    let out = render(&PipelineGraph::build(&config).unwrap()).unwrap();

    assert!(out.contains(" * N = 4, WIDTH = 16, FRAC = 12, sign = -1\n"));
    assert!(out.contains("  #(parameter WIDTH = 16,\n    parameter FRAC  = 12\n"));
    // W4^1 = -i for the negative sign
    assert!(out.contains("        2'd1: begin w_real <= 0; w_imag <= -4096; end"));
}
