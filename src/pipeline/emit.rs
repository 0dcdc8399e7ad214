// src/pipeline/emit.rs

use super::graph::{Node, NodeKind, PipelineGraph};
use crate::common::clog2;
use std::io::{self, Write};

/// Writes the complete hardware description of `graph` to `out`.
///
/// Order: header comment, the shared blend-arithmetic module, one twiddle
/// module per distinct blend size (largest first), then the top-level module.
/// The text depends only on the graph's configuration.
pub fn emit<O: Write>(graph: &PipelineGraph, out: &mut O) -> io::Result<()> {
    write_header(graph, out)?;
    write_blend_module(graph, out)?;
    for size in graph.twiddle_sizes() {
        write_twiddle_module(graph, size, out)?;
    }
    write_top_module(graph, out)?;

    log::debug!(
        "emitted '{}': {} twiddle modules, {} leaves, {} blends",
        graph.name(),
        graph.twiddle_sizes().len(),
        graph.leaf_count(),
        graph.blend_count()
    );
    Ok(())
}

/// Renders the hardware description into a string.
pub fn render(graph: &PipelineGraph) -> io::Result<String> {
    let mut buf = Vec::new();
    emit(graph, &mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn write_header<O: Write>(graph: &PipelineGraph, out: &mut O) -> io::Result<()> {
    let fmt = graph.format();
    writeln!(out, "/*")?;
    writeln!(out, " * This code generated by idft_gen. Do not edit.")?;
    writeln!(out, " *")?;
    writeln!(
        out,
        " * N = {}, WIDTH = {}, FRAC = {}, sign = {}",
        graph.n(),
        fmt.width(),
        fmt.frac(),
        graph.sign()
    )?;
    writeln!(
        out,
        " * F[n] = sum f[k] * exp({} * i * 2 * pi * n * k / N), unnormalized",
        graph.sign()
    )?;
    writeln!(out, " */")?;
    writeln!(out)
}

fn write_blend_module<O: Write>(graph: &PipelineGraph, out: &mut O) -> io::Result<()> {
    let fmt = graph.format();
    writeln!(out, "module {}", graph.blend_module_name())?;
    writeln!(out, "  #(parameter WIDTH = {},", fmt.width())?;
    writeln!(out, "    parameter FRAC  = {}", fmt.frac())?;
    writeln!(out, "    /* */)")?;
    writeln!(out, "   (input  wire clk,")?;
    writeln!(out, "    input  wire reset,")?;
    writeln!(out, "    input  wire in_ready,")?;
    writeln!(out, "    output reg  out_ready,")?;
    for (dir, port) in [
        ("output", "o_real"),
        ("output", "o_imag"),
        ("input ", "a_real"),
        ("input ", "a_imag"),
        ("input ", "w_real"),
        ("input ", "w_imag"),
        ("input ", "b_real"),
    ] {
        writeln!(out, "    {} wire signed [WIDTH-1:0] {},", dir, port)?;
    }
    writeln!(out, "    input  wire signed [WIDTH-1:0] b_imag")?;
    writeln!(out, "    /* */);")?;
    writeln!(out)?;

    // Products are registered, the final sums are combinational
    for (reg, lhs, rhs) in [
        ("wr_br", "w_real", "b_real"),
        ("wi_bi", "w_imag", "b_imag"),
        ("wr_bi", "w_real", "b_imag"),
        ("wi_br", "w_imag", "b_real"),
    ] {
        writeln!(out, "    reg signed [WIDTH*2-1:0] {};", reg)?;
        writeln!(out, "    always @(posedge clk) {} <= {} * {};", reg, lhs, rhs)?;
    }
    writeln!(out)?;
    writeln!(out, "    assign o_real = a_real + (wr_br >>> FRAC) - (wi_bi >>> FRAC);")?;
    writeln!(out, "    assign o_imag = a_imag + (wr_bi >>> FRAC) + (wi_br >>> FRAC);")?;
    writeln!(out)?;
    writeln!(out, "    always @(posedge clk)")?;
    writeln!(out, "      if (reset) out_ready <= 1'b0;")?;
    writeln!(out, "      else       out_ready <= in_ready;")?;
    writeln!(out, "endmodule")?;
    writeln!(out)
}

fn write_twiddle_module<O: Write>(
    graph: &PipelineGraph,
    size: usize,
    out: &mut O,
) -> io::Result<()> {
    let bits = clog2(size);
    let rom = graph.twiddle_rom(size).unwrap_or_default();
    let table = graph.twiddles().get(size);

    writeln!(out, "module {}", graph.twiddle_module_name(size))?;
    writeln!(out, "  #(parameter WIDTH = {}", graph.format().width())?;
    writeln!(out, "    /* */)")?;
    writeln!(out, "   (input  wire clk,")?;
    writeln!(out, "    input  wire [{}:0] idx,", bits - 1)?;
    writeln!(out, "    output reg  signed [WIDTH-1:0] w_real,")?;
    writeln!(out, "    output reg  signed [WIDTH-1:0] w_imag")?;
    writeln!(out, "    /* */);")?;
    writeln!(out)?;
    writeln!(out, "    // W{}^idx, available one clock after idx is applied", size)?;
    writeln!(out, "    always @(posedge clk)")?;
    writeln!(out, "      case (idx)")?;
    for (k, &(re, im)) in rom.iter().enumerate() {
        write!(
            out,
            "        {}'d{}: begin w_real <= {}; w_imag <= {}; end",
            bits, k, re, im
        )?;
        match table {
            Some(table) => {
                let w = table.get(k);
                writeln!(out, " // ({:10.6} {:10.6})", w.re, w.im)?;
            }
            None => writeln!(out)?,
        }
    }
    writeln!(out, "      endcase")?;
    writeln!(out, "endmodule")?;
    writeln!(out)
}

fn write_top_module<O: Write>(graph: &PipelineGraph, out: &mut O) -> io::Result<()> {
    let fmt = graph.format();
    let n = graph.n();

    writeln!(out, "module {}  /* N (number of samples) = {} */", graph.name(), n)?;
    writeln!(out, "  #(parameter WIDTH = {},", fmt.width())?;
    writeln!(out, "    parameter FRAC  = {}", fmt.frac())?;
    writeln!(out, "    /* */)")?;
    writeln!(out, "   (input  wire clk,")?;
    writeln!(out, "    input  wire reset,")?;
    writeln!(out, "    output wire ready,")?;
    writeln!(out, "    // Single output component of the transform")?;
    writeln!(out, "    output wire signed [WIDTH-1:0] dft_real, dft_imag,")?;
    writeln!(out, "    // Which output component are we calculating?")?;
    writeln!(out, "    input  wire [{}:0] dft_idx,", graph.index_bits() - 1)?;
    writeln!(out, "    // Vector of input samples")?;
    writeln!(out, "    input  wire signed [{}:0][WIDTH-1:0] src_real, src_imag", n - 1)?;
    writeln!(out, "    /* */);")?;
    writeln!(out)?;

    for size in graph.twiddle_sizes() {
        let inst = PipelineGraph::twiddle_instance_name(size);
        writeln!(out, "    wire signed [WIDTH-1:0] {0}_real, {0}_imag;", inst)?;
        writeln!(
            out,
            "    {} #(.WIDTH(WIDTH)) {}",
            graph.twiddle_module_name(size),
            inst
        )?;
        writeln!(
            out,
            "      (.clk(clk), .idx(dft_idx[{}:0]), .w_real({inst}_real), .w_imag({inst}_imag));",
            clog2(size) - 1
        )?;
    }
    if !graph.twiddle_sizes().is_empty() {
        writeln!(out)?;
    }

    for node in graph.nodes() {
        match *node.kind() {
            NodeKind::Leaf { a, b } => write_leaf(node, a, b, out)?,
            NodeKind::Blend { even, odd } => {
                write_blend(graph, node, graph.node(even), graph.node(odd), out)?
            }
        }
        writeln!(out)?;
    }

    let root = graph.node(graph.root()).name();
    writeln!(out, "    assign dft_real = {}_real;", root)?;
    writeln!(out, "    assign dft_imag = {}_imag;", root)?;
    writeln!(out, "    assign ready    = {}_ready;", root)?;
    writeln!(out, "endmodule")
}

fn write_leaf<O: Write>(node: &Node, a: usize, b: usize, out: &mut O) -> io::Result<()> {
    let name = node.name();
    writeln!(out, "    // {} == src[{}] +/- src[{}] (leaf)", name, a, b)?;
    for part in ["real", "imag"] {
        writeln!(
            out,
            "    wire signed [WIDTH-1:0] {}_{} = $signed(src_{}[{}])",
            name, part, part, a
        )?;
        writeln!(
            out,
            "        + (dft_idx[0] ? -$signed(src_{0}[{1}]) : $signed(src_{0}[{1}]));",
            part, b
        )?;
    }
    writeln!(out, "    reg {}_ready;", name)?;
    writeln!(out, "    always @(posedge clk)")?;
    writeln!(out, "      if (reset) {}_ready <= 1'b0;", name)?;
    writeln!(out, "      else       {}_ready <= 1'b1;", name)
}

fn write_blend<O: Write>(
    graph: &PipelineGraph,
    node: &Node,
    even: &Node,
    odd: &Node,
    out: &mut O,
) -> io::Result<()> {
    let name = node.name();
    let (e, o) = (even.name(), odd.name());
    let w = PipelineGraph::twiddle_instance_name(node.size());

    writeln!(
        out,
        "    // {} == {} + W{}^idx * {} (blend)",
        name,
        e,
        node.size(),
        o
    )?;
    writeln!(out, "    wire signed [WIDTH-1:0] {0}_real, {0}_imag;", name)?;
    writeln!(out, "    wire {}_ready;", name)?;
    writeln!(
        out,
        "    {} #(.WIDTH(WIDTH), .FRAC(FRAC)) {}_math",
        graph.blend_module_name(),
        name
    )?;
    writeln!(out, "      (.clk(clk), .reset(reset),")?;
    writeln!(
        out,
        "       .in_ready({}_ready & {}_ready), .out_ready({}_ready),",
        e, o, name
    )?;
    writeln!(out, "       .o_real({0}_real), .o_imag({0}_imag),", name)?;
    writeln!(out, "       .a_real({0}_real), .a_imag({0}_imag),", e)?;
    writeln!(out, "       .w_real({0}_real), .w_imag({0}_imag),", w)?;
    writeln!(out, "       .b_real({0}_real), .b_imag({0}_imag));", o)
}

#[cfg(test)]
#[path = "emit_tests.rs"]
mod tests;
