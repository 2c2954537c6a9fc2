//! Code classification command.

use dxnorm::models::code::{is_st_george_course, program_area};
use dxnorm::models::{CodeKind, Unclassifiable, classify};

/// Classify-code command.
///
/// Prints one tab-separated line per code: the code, its kind, and any extra
/// detail the vocabulary knows about it.
pub fn cmd_classify_code(codes: &[String]) {
    for code in codes {
        let line = match classify(code) {
            Ok(CodeKind::Course) if is_st_george_course(code) => {
                format!("{code}\tcourse\tst george")
            },
            Ok(CodeKind::Program) => match program_area(code) {
                Some(area) => format!("{code}\tprogram\tarea {area}"),
                None => format!("{code}\tprogram"),
            },
            Ok(kind) => format!("{code}\t{kind}"),
            Err(Unclassifiable::Empty) => format!("{code:?}\tempty"),
            Err(Unclassifiable::Unknown(_)) => format!("{code:?}\tunclassifiable"),
        };
        println!("{line}");
    }
}
