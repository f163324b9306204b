//! The interactive REPL: the foreground controller thread. Blocks on
//! stdin, recognizing `stat`, `cam`, `igmp`, `help`, `quit`, and EOF.

use std::io::{BufRead, Write};

use crate::switch::Switch;

/// `Iface  Sent-B  Sent-frm  Recv-B  Recv-frm` table, one row per
/// registered interface in registration order.
fn render_stat(switch: &Switch) -> String {
    let mut out = String::from("Iface  Sent-B  Sent-frm  Recv-B  Recv-frm\n");
    for iface in switch.interfaces.snapshot() {
        out.push_str(&format!(
            "{}  {}  {}  {}  {}\n",
            iface.name(),
            iface.sent_bytes(),
            iface.sent_frames(),
            iface.recv_bytes(),
            iface.recv_frames()
        ));
    }
    out
}

const HELP_TEXT: &str = "commands: stat, cam, igmp, help, quit";

/// Run the REPL to completion (on `quit` or EOF), writing all output
/// to `out`. Parameterized over the writer so tests can capture it.
pub fn run<R: BufRead, W: Write>(switch: &Switch, input: R, mut out: W) {
    for line in input.lines() {
        let Ok(line) = line else { break };
        match line.trim() {
            "stat" => {
                let _ = write!(out, "{}", render_stat(switch));
            }
            "cam" => {
                let _ = write!(out, "{}", switch.cam.render());
            }
            "igmp" => {
                let _ = write!(out, "{}", switch.multicast.render());
            }
            "help" => {
                let _ = writeln!(out, "{}", HELP_TEXT);
            }
            "quit" => break,
            "" => {}
            other => {
                let _ = writeln!(out, "unknown command: {other} ({HELP_TEXT})");
            }
        }
    }
}
