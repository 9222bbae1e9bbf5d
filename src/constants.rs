//! Shared constants for the sasb toolchain.

/// Name of the project configuration file searched for upward from the
/// current directory.
pub const CONFIG_FILE_NAME: &str = "sasbconfig.json";

/// Folder name of the bundled core macro library. Always the lowest-priority
/// search root; any project-local candidate overrides a file found under a
/// path containing this segment.
pub const CORE_LIB_FOLDER: &str = "sasbcore";

/// Recognized program-file extension. Dependency names are normalized to
/// carry it; references to any other extension are ignored.
pub const SAS_FILE_EXTENSION: &str = ".sas";

/// Compute context used when a target does not configure one.
pub const DEFAULT_COMPUTE_CONTEXT: &str = "SAS Job Execution compute context";

/// Default output folder for compiled artifacts, relative to the project dir.
pub const DEFAULT_BUILD_OUTPUT_FOLDER: &str = "sasbbuild";

/// Maximum payload length of a single generated `put` statement. SAS source
/// lines beyond this are split and continued with `@;`.
pub const MAX_PUT_LINE_LENGTH: usize = 220;

/// Environment variable that disables progress indicators.
pub const ENV_NO_PROGRESS: &str = "SASB_NO_PROGRESS";

/// Environment variable carrying the access token for server requests.
pub const ENV_ACCESS_TOKEN: &str = "SASB_ACCESS_TOKEN";

/// The `%sasbout` macro prepended to every generated streaming web service.
/// It replays the temporary `sasb` fileref to `_webout` with the right
/// content type for the requested payload kind.
pub const SASB_OUT_MACRO: &str = r#"%macro sasbout(type);
%global sysprocessmode;
%if &type=HTML %then %do;
  %let rc=%sysfunc(stpsrv_header(Content-type,text/html));
%end;
%else %if &type=JS or &type=JS64 %then %do;
  %let rc=%sysfunc(stpsrv_header(Content-type,application/javascript));
%end;
%else %if &type=CSS or &type=CSS64 %then %do;
  %let rc=%sysfunc(stpsrv_header(Content-type,text/css));
%end;
data _null_;
  rc=fcopy('sasb','_webout');
run;
%mend sasbout;"#;
