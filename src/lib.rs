// gpudev - manage the GPU development environment CloudFormation stack
//
// One binary, four actions:
// - create / update: submit the template with the four stack parameters
// - delete: request deletion if the stack exists
// - status: report the stack status and its SSH command output
//
// Configuration lives in gpudev-config; CloudFormation access in gpudev-stack.

mod init;

pub mod deploy;

pub use init::init_tracing;
