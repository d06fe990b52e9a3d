//! CRD generation binary
//!
//! Prints every registered CRD as YAML. With `--rbac`, also prints the
//! ClusterRole the controller needs.

use crds::{Scheme, add_to_scheme, rbac};

const CLUSTER_ROLE_NAME: &str = "demo-controller";

fn main() -> anyhow::Result<()> {
    let mut scheme = Scheme::new();
    add_to_scheme(&mut scheme)?;

    print!("{}", scheme.to_yaml()?);

    if std::env::args().any(|arg| arg == "--rbac") {
        println!("---");
        print!("{}", serde_yaml::to_string(&rbac::cluster_role(CLUSTER_ROLE_NAME))?);
    }

    Ok(())
}
