use msh_reader::Mesh;
use std::env;
use std::io::{self, BufWriter, Write};

const ACTIONS: &[&str] = &["info", "nodes", "elements"];

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        eprintln!("Usage: {} <path-to-msh-file> <{}>", program_name(&args), ACTIONS.join("|"));
        std::process::exit(1);
    }

    let msh_path = &args[1];
    let action = args[2].as_str();
    if !ACTIONS.contains(&action) {
        eprintln!("ERROR: Unknown action '{}'. Expected one of: {}", action, ACTIONS.join(", "));
        std::process::exit(1);
    }

    let mesh = match msh_reader::parse(msh_path) {
        Ok(mesh) => mesh,
        Err(e) => {
            eprintln!("ERROR: Failed to read mesh file");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let result = match action {
        "info" => info(&mesh, &mut out),
        "nodes" => nodes(&mesh, &mut out),
        _ => elements(&mesh, &mut out),
    }
    .and_then(|()| out.flush());

    if let Err(e) = result {
        // A closed pipe (e.g. `| head`) is not a failure.
        if e.kind() != io::ErrorKind::BrokenPipe {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}

/// argv[0], which the OS may leave out.
fn program_name(args: &[String]) -> &str {
    args.first().map_or("msh-reader", String::as_str)
}

fn info(mesh: &Mesh, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "---- MESH SUMMARY ----")?;
    write!(out, "{}", mesh)
}

/// Node count, then `tag x y z` per node.
fn nodes(mesh: &Mesh, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", mesh.number_of_nodes())?;
    for node in mesh.nodes() {
        let [x, y, z] = node.coordinates;
        writeln!(out, "{} {:.6} {:.6} {:.6}", node.tag, x, y, z)?;
    }
    Ok(())
}

/// Element count, then `tag type node...` per element.
fn elements(mesh: &Mesh, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", mesh.number_of_elements())?;
    for element in mesh.elements() {
        write!(out, "{} {}", element.tag(), element.element_type())?;
        for node in element.connectivity() {
            write!(out, " {}", node)?;
        }
        writeln!(out)?;
    }
    Ok(())
}
